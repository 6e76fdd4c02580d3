//! The wrapper descriptor and its Kotlin rendering.

use serde::Serialize;
use std::fmt;

pub use crate::signature::TypeParameter;

/// One synthesizable `inline fun <reified T>` wrapper.
///
/// Built once per eligible method by the scanner and rendered by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReifiedTypeParametersExtensionFunction {
    pub type_parameter_name: String,
    pub extended_type_type_parameters: Vec<TypeParameter>,
    /// Fully-qualified name of the owning type.
    pub extended_type: String,
    pub function_name: String,
    pub return_type: String,
    /// Parameter name to parameter type, in declaration order.
    pub parameters: Vec<(String, String)>,
}

impl ReifiedTypeParametersExtensionFunction {
    /// `<A, B : Bound, reified T>`
    pub fn type_parameters_declaration(&self) -> String {
        let extended = if self.extended_type_type_parameters.is_empty() {
            String::new()
        } else {
            let declared: Vec<String> = self
                .extended_type_type_parameters
                .iter()
                .map(|parameter| match &parameter.bounds {
                    Some(bounds) => format!("{} : {}", parameter.name, bounds),
                    None => parameter.name.clone(),
                })
                .collect();
            format!("{}, ", declared.join(", "))
        };
        format!("<{}reified {}>", extended, self.type_parameter_name)
    }

    /// `org.gradle.api.Thing<A, B>`
    pub fn extended_type_declaration(&self) -> String {
        if self.extended_type_type_parameters.is_empty() {
            self.extended_type.clone()
        } else {
            let names: Vec<&str> = self
                .extended_type_type_parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect();
            format!("{}<{}>", self.extended_type, names.join(", "))
        }
    }

    pub fn parameters_declaration(&self) -> String {
        self.parameters
            .iter()
            .map(|(name, type_name)| format!("{}: {}", name, type_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn parameters_passing(&self) -> String {
        if self.parameters.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = self.parameters.iter().map(|(name, _)| name.as_str()).collect();
            format!(", {}", names.join(", "))
        }
    }

    /// The declaration text, without a trailing newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReifiedTypeParametersExtensionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inline")?;
        writeln!(
            f,
            "fun {} {}.{}({}): {} =",
            self.type_parameters_declaration(),
            self.extended_type_declaration(),
            self.function_name,
            self.parameters_declaration(),
            self.return_type
        )?;
        write!(
            f,
            "    {}({}::class.java{})",
            self.function_name,
            self.type_parameter_name,
            self.parameters_passing()
        )
    }
}
