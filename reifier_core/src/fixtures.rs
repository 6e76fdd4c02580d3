//! Synthetic class files and jars for tests.

use crate::classfile::{ACC_ABSTRACT, ACC_INTERFACE, ACC_PUBLIC, OBJECT_INTERNAL_NAME};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(crate) struct MethodSpec {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    code: bool,
}

impl MethodSpec {
    pub(crate) fn new(access: u16, name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        Self {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(String::from),
            code: false,
        }
    }

    pub(crate) fn public(name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        Self::new(ACC_PUBLIC, name, descriptor, signature)
    }

    pub(crate) fn public_abstract(name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        Self::new(ACC_PUBLIC | ACC_ABSTRACT, name, descriptor, signature)
    }

    /// Adds a trivial `Code` attribute the reader has to skip.
    pub(crate) fn with_code(mut self) -> Self {
        self.code = true;
        self
    }
}

/// Assembles a class file with a deduplicated constant pool.
pub(crate) struct ClassFileBuilder {
    access: u16,
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    fields: Vec<(String, String)>,
    methods: Vec<MethodSpec>,
    long_constants: Vec<i64>,
}

impl ClassFileBuilder {
    pub(crate) fn class(name: &str) -> Self {
        Self {
            access: ACC_PUBLIC,
            name: name.to_string(),
            super_name: Some(OBJECT_INTERNAL_NAME.to_string()),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
            long_constants: Vec::new(),
        }
    }

    pub(crate) fn interface(name: &str) -> Self {
        let mut builder = Self::class(name);
        builder.access = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        builder
    }

    pub(crate) fn super_name(mut self, super_name: Option<&str>) -> Self {
        self.super_name = super_name.map(String::from);
        self
    }

    pub(crate) fn interface_name(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub(crate) fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub(crate) fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_string(), descriptor.to_string()));
        self
    }

    pub(crate) fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    pub(crate) fn long_constant(mut self, value: i64) -> Self {
        self.long_constants.push(value);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut pool = PoolBuilder::default();
        for value in &self.long_constants {
            pool.long(*value);
        }

        let this_class = pool.class(&self.name);
        let super_class = self.super_name.as_deref().map(|name| pool.class(name)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|name| pool.class(name)).collect();

        let mut body = Vec::new();
        push_u2(&mut body, self.access);
        push_u2(&mut body, this_class);
        push_u2(&mut body, super_class);
        push_u2(&mut body, interfaces.len() as u16);
        for index in interfaces {
            push_u2(&mut body, index);
        }

        push_u2(&mut body, self.fields.len() as u16);
        for (name, descriptor) in &self.fields {
            push_u2(&mut body, ACC_PUBLIC);
            push_u2(&mut body, pool.utf8(name));
            push_u2(&mut body, pool.utf8(descriptor));
            // a zero-length Deprecated attribute
            push_u2(&mut body, 1);
            push_u2(&mut body, pool.utf8("Deprecated"));
            push_u4(&mut body, 0);
        }

        push_u2(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            push_u2(&mut body, method.access);
            push_u2(&mut body, pool.utf8(&method.name));
            push_u2(&mut body, pool.utf8(&method.descriptor));
            let attribute_count = method.signature.is_some() as u16 + method.code as u16;
            push_u2(&mut body, attribute_count);
            if method.code {
                // max_stack, max_locals, code_length, aconst_null + areturn,
                // empty exception table and attributes
                let code = [0, 1, 0, 2, 0, 0, 0, 2, 0x01, 0xB0, 0, 0, 0, 0];
                push_u2(&mut body, pool.utf8("Code"));
                push_u4(&mut body, code.len() as u32);
                body.extend_from_slice(&code);
            }
            if let Some(signature) = &method.signature {
                push_signature(&mut body, &mut pool, signature);
            }
        }

        match &self.signature {
            Some(signature) => {
                push_u2(&mut body, 1);
                push_signature(&mut body, &mut pool, signature);
            }
            None => push_u2(&mut body, 0),
        }

        let mut bytes = Vec::new();
        push_u4(&mut bytes, 0xCAFE_BABE);
        push_u2(&mut bytes, 0);
        push_u2(&mut bytes, 52);
        push_u2(&mut bytes, pool.next_index);
        bytes.extend_from_slice(&pool.bytes);
        bytes.extend_from_slice(&body);
        bytes
    }
}

fn push_signature(body: &mut Vec<u8>, pool: &mut PoolBuilder, signature: &str) {
    push_u2(body, pool.utf8("Signature"));
    push_u4(body, 2);
    push_u2(body, pool.utf8(signature));
}

fn push_u2(bytes: &mut Vec<u8>, value: u16) {
    bytes.extend_from_slice(&value.to_be_bytes());
}

fn push_u4(bytes: &mut Vec<u8>, value: u32) {
    bytes.extend_from_slice(&value.to_be_bytes());
}

struct PoolBuilder {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: Vec<(String, u16)>,
    classes: Vec<(String, u16)>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
            utf8: Vec::new(),
            classes: Vec::new(),
        }
    }
}

impl PoolBuilder {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some((_, index)) = self.utf8.iter().find(|(existing, _)| existing == value) {
            return *index;
        }
        let index = self.next_index;
        self.bytes.push(1);
        push_u2(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        self.next_index += 1;
        self.utf8.push((value.to_string(), index));
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some((_, index)) = self.classes.iter().find(|(existing, _)| existing == name) {
            return *index;
        }
        let name_index = self.utf8(name);
        let index = self.next_index;
        self.bytes.push(7);
        push_u2(&mut self.bytes, name_index);
        self.next_index += 1;
        self.classes.push((name.to_string(), index));
        index
    }

    fn long(&mut self, value: i64) {
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.next_index += 2;
    }
}

/// Writes a stored (uncompressed) jar with the given entries, in order.
pub(crate) fn write_jar(dir: &Path, file_name: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in entries {
        if name.ends_with('/') {
            zip.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }
    zip.finish().unwrap();
    path
}

const CLASS_TOKEN: &str = "(Ljava/lang/Class;)";

/// `org.gradle.api.Project` with two eligible methods, `property` first.
pub(crate) fn project_class() -> Vec<u8> {
    ClassFileBuilder::interface("org/gradle/api/Project")
        .signature("Ljava/lang/Object;Ljava/lang/Comparable<Lorg/gradle/api/Project;>;Lorg/gradle/api/plugins/ExtensionAware;")
        .interface_name("java/lang/Comparable")
        .interface_name("org/gradle/api/plugins/ExtensionAware")
        .method(MethodSpec::public_abstract(
            "getName",
            "()Ljava/lang/String;",
            None,
        ))
        .method(MethodSpec::public_abstract(
            "property",
            "(Ljava/lang/Class;)Lorg/gradle/api/provider/PropertyState;",
            Some("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;)Lorg/gradle/api/provider/PropertyState<TT;>;"),
        ))
        .method(MethodSpec::public_abstract(
            "container",
            "(Ljava/lang/Class;)Lorg/gradle/api/NamedDomainObjectContainer;",
            Some("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;)Lorg/gradle/api/NamedDomainObjectContainer<TT;>;"),
        ))
        .method(MethodSpec::public_abstract(
            "container",
            "(Ljava/lang/Class;Lorg/gradle/api/NamedDomainObjectFactory;)Lorg/gradle/api/NamedDomainObjectContainer;",
            Some("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;Lorg/gradle/api/NamedDomainObjectFactory<TT;>;)Lorg/gradle/api/NamedDomainObjectContainer<TT;>;"),
        ))
        .method(MethodSpec::public_abstract(
            "apply",
            "(Ljava/util/Map;)V",
            Some("(Ljava/util/Map<Ljava/lang/String;*>;)V"),
        ))
        .method(MethodSpec::public_abstract(
            "compareTo",
            "(Ljava/lang/Object;)I",
            None,
        ))
        .build()
}

/// Generic class: everything inside is skipped.
pub(crate) fn plugin_collection_class() -> Vec<u8> {
    ClassFileBuilder::interface("org/gradle/api/plugins/PluginCollection")
        .signature("<T::Lorg/gradle/api/Plugin;>Ljava/lang/Object;Lorg/gradle/api/DomainObjectSet<TT;>;")
        .interface_name("org/gradle/api/DomainObjectSet")
        .method(MethodSpec::public_abstract(
            "withType",
            &format!("{}Lorg/gradle/api/plugins/PluginCollection;", CLASS_TOKEN),
            Some("<S:TT;>(Ljava/lang/Class<TS;>;)Lorg/gradle/api/plugins/PluginCollection<TS;>;"),
        ))
        .build()
}

/// Non-generic methods only.
pub(crate) fn object_configuration_action_class() -> Vec<u8> {
    ClassFileBuilder::interface("org/gradle/api/plugins/ObjectConfigurationAction")
        .signature("Ljava/lang/Object;")
        .method(MethodSpec::public_abstract(
            "plugin",
            &format!("{}Lorg/gradle/api/plugins/ObjectConfigurationAction;", CLASS_TOKEN),
            Some("(Ljava/lang/Class<+Lorg/gradle/api/Plugin;>;)Lorg/gradle/api/plugins/ObjectConfigurationAction;"),
        ))
        .method(MethodSpec::public_abstract(
            "type",
            &format!("{}Lorg/gradle/api/plugins/ObjectConfigurationAction;", CLASS_TOKEN),
            Some("(Ljava/lang/Class<*>;)Lorg/gradle/api/plugins/ObjectConfigurationAction;"),
        ))
        .build()
}

/// Bounded or blacklisted methods only.
pub(crate) fn plugin_container_class() -> Vec<u8> {
    ClassFileBuilder::interface("org/gradle/api/plugins/PluginContainer")
        .signature("Ljava/lang/Object;Lorg/gradle/api/plugins/PluginCollection<Lorg/gradle/api/Plugin;>;")
        .interface_name("org/gradle/api/plugins/PluginCollection")
        .method(MethodSpec::public_abstract(
            "apply",
            &format!("{}Lorg/gradle/api/Plugin;", CLASS_TOKEN),
            Some("<T::Lorg/gradle/api/Plugin;>(Ljava/lang/Class<TT;>;)TT;"),
        ))
        .method(MethodSpec::public_abstract(
            "findPlugin",
            &format!("{}Lorg/gradle/api/Plugin;", CLASS_TOKEN),
            Some("<T::Lorg/gradle/api/Plugin;>(Ljava/lang/Class<TT;>;)TT;"),
        ))
        .method(MethodSpec::public_abstract(
            "getPlugin",
            &format!("{}Lorg/gradle/api/Plugin;", CLASS_TOKEN),
            Some("<T::Lorg/gradle/api/Plugin;>(Ljava/lang/Class<TT;>;)TT;"),
        ))
        .build()
}

/// No class signature, so its otherwise eligible methods are skipped.
pub(crate) fn convention_class() -> Vec<u8> {
    ClassFileBuilder::interface("org/gradle/api/plugins/Convention")
        .interface_name("org/gradle/api/plugins/ExtensionContainer")
        .method(MethodSpec::public_abstract(
            "getPlugin",
            &format!("{}Ljava/lang/Object;", CLASS_TOKEN),
            Some("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;)TT;"),
        ))
        .method(MethodSpec::public_abstract(
            "findPlugin",
            &format!("{}Ljava/lang/Object;", CLASS_TOKEN),
            Some("<T:Ljava/lang/Object;>(Ljava/lang/Class<TT;>;)TT;"),
        ))
        .build()
}

/// `gradle-reified-type-parameters.jar` with the five types above.
pub(crate) fn reified_type_parameters_jar(dir: &Path) -> PathBuf {
    write_jar(
        dir,
        "gradle-reified-type-parameters.jar",
        &[
            ("META-INF/", Vec::new()),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n".to_vec()),
            ("org/gradle/api/Project.class", project_class()),
            (
                "org/gradle/api/plugins/PluginCollection.class",
                plugin_collection_class(),
            ),
            (
                "org/gradle/api/plugins/ObjectConfigurationAction.class",
                object_configuration_action_class(),
            ),
            (
                "org/gradle/api/plugins/PluginContainer.class",
                plugin_container_class(),
            ),
            ("org/gradle/api/plugins/Convention.class", convention_class()),
        ],
    )
}
