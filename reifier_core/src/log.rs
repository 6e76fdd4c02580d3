/// Internal macro for common logging logic
#[macro_export]
#[doc(hidden)]
macro_rules! __internal_log_impl {
    // Standard variant - resolves the log directory from REIFIER_LOG_DIR
    ($content:expr, $log_subdir:expr, standard) => {{
        let filename = format!("{}.log", chrono::Local::now().format("%Y_%m_%d_%H_%M_%S"));
        $crate::__internal_log_impl!($content, $log_subdir, filename, false, standard);
    }};

    ($content:expr, $log_subdir:expr, $filename:expr, standard) => {{
        $crate::__internal_log_impl!($content, $log_subdir, $filename, false, standard);
    }};

    ($content:expr, $log_subdir:expr, $filename:expr, $append:expr, standard) => {{
        // Logging is skipped entirely when REIFIER_LOG_DIR is unset
        if let Ok(base_dir) = std::env::var("REIFIER_LOG_DIR") {
            let logs_dir = format!("{}/{}", base_dir, $log_subdir);
            $crate::__internal_log_impl!($content, logs_dir, $filename, $append, impl);
        }
    }};

    // Core implementation
    ($content:expr, $logs_dir:expr, $filename:expr, $append:expr, impl) => {{
        use std::io::Write;

        let _ = std::fs::create_dir_all(&$logs_dir);

        let path_str = &format!("{}/{}", $logs_dir, $filename);
        let path = std::path::Path::new(path_str);

        let mut options = std::fs::OpenOptions::new();
        options.create(true);
        if $append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        if let Ok(mut file_handle) = options.open(path) {
            let expr_str = stringify!($content);
            let formatted = if expr_str.starts_with("format!")
                || expr_str.starts_with("&format!")
                || expr_str.starts_with("\"")
                || expr_str.starts_with("String::")
            {
                format!("{}\n", $content)
            } else {
                let value_str = format!("{:#?}", &$content);

                if value_str.contains('\n') || value_str.len() > 80 {
                    format!(
                        "[{}:{}] {} = \n{}\n",
                        file!(),
                        line!(),
                        stringify!($content),
                        value_str
                    )
                } else {
                    format!(
                        "[{}:{}] {} = {}\n",
                        file!(),
                        line!(),
                        stringify!($content),
                        value_str
                    )
                }
            };
            let _ = file_handle.write_all(formatted.as_bytes());
        }
    }};
}

/// Debug file logging for the reifier crates.
///
/// Writes under `$REIFIER_LOG_DIR/reifier/logs/`. Does nothing when the
/// variable is not set.
///
/// # Examples
///
/// Log to a timestamp-based file (e.g., "2024_01_12_14_30_52.log"):
/// ```no_run
/// # use reifier_core::reifier_log;
/// reifier_log!("Scan started");
/// ```
///
/// Log to a specific file, appending:
/// ```no_run
/// # use reifier_core::reifier_log;
/// reifier_log!("org.gradle.api.Project.property", "descriptors.log", true);
/// ```
#[macro_export]
macro_rules! reifier_log {
    ($content:expr) => {{
        $crate::__internal_log_impl!($content, "reifier/logs", standard);
    }};
    ($content:expr, $filename:expr) => {{
        $crate::__internal_log_impl!($content, "reifier/logs", $filename, standard);
    }};
    ($content:expr, $filename:expr, $append:expr) => {{
        $crate::__internal_log_impl!($content, "reifier/logs", $filename, $append, standard);
    }};
}
