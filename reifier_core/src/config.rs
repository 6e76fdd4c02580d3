use crate::error::{ReifierError, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

/// Name of the configuration file searched for in the current directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "reifier.toml";

/// Scanning rules: which jars and entries are looked at, and which names are never wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Only archives whose file name starts with this prefix are scanned
    pub jar_prefix: String,
    /// Only entries under this internal-name prefix are scanned
    pub root_namespace: String,
    /// Fully-qualified type names whose methods are never wrapped
    pub type_class_name_blacklist: Vec<String>,
    /// Method names that are never wrapped
    pub method_name_blacklist: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            jar_prefix: "gradle-".to_string(),
            root_namespace: "org/gradle/".to_string(),
            type_class_name_blacklist: Vec::new(),
            method_name_blacklist: vec!["apply".to_string()],
        }
    }
}

/// Where and how the generated Kotlin source is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the generated Kotlin file
    pub path: String,
    /// Kotlin package declared in the file header
    pub package: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "build/generated-src/ReifiedTypeParametersExtensions.kt".to_string(),
            package: "org.gradle.kotlin.dsl".to_string(),
        }
    }
}

/// Archives to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClasspathConfig {
    /// Explicit archive paths, scanned first and in this order
    pub jars: Vec<String>,
    /// Directories searched recursively for `*.jar`, in file name order
    pub directories: Vec<String>,
}

/// Root configuration, usually read from `reifier.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReifierConfig {
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub classpath: ClasspathConfig,
}

impl ReifierConfig {
    /// Load configuration by searching for reifier.toml in the current
    /// directory and its ancestors.
    pub fn new() -> Result<ReifierConfig> {
        info!("Loading reifier configuration");
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        let config_path = Self::find_config_file(&env::current_dir()?)?;
        info!("Found configuration file at: {:?}", config_path);

        Self::from_path(&config_path)
    }

    /// Load configuration from a specific file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<ReifierConfig> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file {:?}: {}", path, e);
            ReifierError::from(e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());

        let mut config = Self::parse(&contents)?;
        if let Some(base_dir) = path.parent() {
            config.resolve_relative_to(base_dir);
        }
        Ok(config)
    }

    /// Parses TOML content and substitutes environment variables.
    pub fn parse(contents: &str) -> Result<ReifierConfig> {
        let mut config: ReifierConfig = toml::from_str(contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            ReifierError::config(e.to_string())
        })?;

        debug!("Substituting environment variables in configuration");
        config.output.path = Self::substitute_env_vars(&config.output.path)?;
        for jar in &mut config.classpath.jars {
            *jar = Self::substitute_env_vars(jar)?;
        }
        for directory in &mut config.classpath.directories {
            *directory = Self::substitute_env_vars(directory)?;
        }

        debug!(
            "Scan prefix: {}, root namespace: {}, output: {}",
            config.scan.jar_prefix, config.scan.root_namespace, config.output.path
        );
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Archive paths to scan: explicit jars first, then `*.jar` files found
    /// under each directory, sorted by file name.
    pub fn jar_paths(&self) -> Result<Vec<PathBuf>> {
        let mut jars: Vec<PathBuf> = self.classpath.jars.iter().map(PathBuf::from).collect();
        for directory in &self.classpath.directories {
            let directory = Path::new(directory);
            if !directory.is_dir() {
                return Err(ReifierError::InvalidPath {
                    path: directory.to_path_buf(),
                });
            }
            for entry in walkdir::WalkDir::new(directory).sort_by_file_name() {
                let entry = entry.map_err(|e| ReifierError::Io(e.into()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "jar")
                {
                    trace!("Found archive: {:?}", entry.path());
                    jars.push(entry.into_path());
                }
            }
        }
        Ok(jars)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }

    /// Creates a builder for programmatic configuration.
    pub fn builder() -> ReifierConfigBuilder {
        ReifierConfigBuilder::default()
    }

    fn resolve_relative_to(&mut self, base_dir: &Path) {
        let resolve = |value: &mut String| {
            if Path::new(value.as_str()).is_relative() {
                *value = base_dir.join(value.as_str()).to_string_lossy().into_owned();
            }
        };
        resolve(&mut self.output.path);
        self.classpath.jars.iter_mut().for_each(resolve);
        self.classpath.directories.iter_mut().for_each(resolve);
    }

    /// Searches for `reifier.toml` starting from `start_dir` and traversing up to the root.
    pub fn find_config_file(start_dir: &Path) -> Result<PathBuf> {
        debug!("Starting config file search from: {:?}", start_dir);

        for path in start_dir.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.exists() {
                return Ok(config_path);
            }
        }

        debug!("Configuration file '{}' not found in any parent directory.", CONFIG_FILE_NAME);
        Err(ReifierError::ConfigNotFound {
            search_start: start_dir.to_path_buf(),
        })
    }

    /// Substitute environment variables in config strings
    /// Supports ${VAR_NAME:-default} syntax
    fn substitute_env_vars(value: &str) -> Result<String> {
        trace!("Substituting environment variables in: {}", value);
        let mut result = value.to_string();

        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")?;

        for cap in re.captures_iter(value) {
            let var_name = &cap[1];
            let default_value = cap.get(2).map(|m| m.as_str());

            let replacement = match env::var(var_name) {
                Ok(val) => {
                    debug!("Resolved environment variable: {}", var_name);
                    val
                }
                Err(_) => match default_value {
                    Some(default) => {
                        warn!(
                            "Environment variable {} not set, using default: {}",
                            var_name, default
                        );
                        default.to_string()
                    }
                    None => {
                        error!(
                            "Environment variable {} not set and no default provided",
                            var_name
                        );
                        return Err(ReifierError::EnvVarNotSet(var_name.to_string()));
                    }
                },
            };

            result = result.replace(&cap[0], &replacement);
        }

        Ok(result)
    }
}

/// Builder for creating ReifierConfig programmatically.
#[derive(Debug, Clone, Default)]
pub struct ReifierConfigBuilder {
    config: ReifierConfig,
}

impl ReifierConfigBuilder {
    /// Starts from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: ReifierConfig) -> Self {
        Self { config }
    }

    pub fn jar_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.scan.jar_prefix = prefix.into();
        self
    }

    pub fn root_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.scan.root_namespace = namespace.into();
        self
    }

    /// Adds a fully-qualified type name to the type blacklist.
    pub fn blacklist_type(mut self, type_name: impl Into<String>) -> Self {
        self.config.scan.type_class_name_blacklist.push(type_name.into());
        self
    }

    /// Replaces the method-name blacklist.
    pub fn method_name_blacklist(mut self, names: Vec<String>) -> Self {
        self.config.scan.method_name_blacklist = names;
        self
    }

    pub fn output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.output.path = path.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.config.output.package = package.into();
        self
    }

    /// Appends an archive to scan.
    pub fn jar(mut self, path: impl AsRef<Path>) -> Self {
        self.config
            .classpath
            .jars
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Replaces the explicit archive list.
    pub fn jars<P: AsRef<Path>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.config.classpath.jars = paths
            .into_iter()
            .map(|path| path.as_ref().to_string_lossy().into_owned())
            .collect();
        self
    }

    pub fn directory(mut self, path: impl AsRef<Path>) -> Self {
        self.config
            .classpath
            .directories
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn build(self) -> ReifierConfig {
        self.config
    }
}
