//! Eligibility heuristic applied to one compiled class.

use super::model::{ReifiedTypeParametersExtensionFunction, TypeParameter};
use crate::classfile::{
    ClassHeader, ClassReader, ClassVisitor, JavaType, MethodDescriptor, MethodHeader,
    internal_to_class_name,
};
use crate::config::ScanConfig;
use crate::error::{ReifierError, Result};
use crate::signature::type_parameters;
use tracing::trace;

const OBJECT_CLASS_NAME: &str = "java.lang.Object";
const CLASS_CLASS_NAME: &str = "java.lang.Class";

/// Raw bytes of one `.class` archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub entry_name: String,
    pub bytes: Vec<u8>,
}

impl ClassRecord {
    pub fn new(entry_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            entry_name: entry_name.into(),
            bytes,
        }
    }
}

/// Returns one descriptor per eligible method of the class, in method order.
///
/// Bytes that are not a class file are a hard error; missing or malformed
/// generic metadata only makes the class or method ineligible.
pub fn select_functions_from(
    record: &ClassRecord,
    config: &ScanConfig,
) -> Result<Vec<ReifiedTypeParametersExtensionFunction>> {
    let reader = ClassReader::new(&record.bytes)
        .map_err(|e| ReifierError::class_format(&record.entry_name, e.to_string()))?;
    let mut visitor = ReifiedTypeParametersExtensionsVisitor::new(config);
    reader.accept(&mut visitor);
    Ok(visitor.extensions)
}

struct ReifiedTypeParametersExtensionsVisitor<'a> {
    config: &'a ScanConfig,
    /// Set once the class passed the class-level checks.
    extended_type: Option<String>,
    extensions: Vec<ReifiedTypeParametersExtensionFunction>,
}

impl<'a> ReifiedTypeParametersExtensionsVisitor<'a> {
    fn new(config: &'a ScanConfig) -> Self {
        Self {
            config,
            extended_type: None,
            extensions: Vec::new(),
        }
    }
}

impl ClassVisitor for ReifiedTypeParametersExtensionsVisitor<'_> {
    fn visit(&mut self, header: &ClassHeader<'_>) {
        let type_class_name = internal_to_class_name(header.name);

        if self.config.type_class_name_blacklist.contains(&type_class_name) {
            trace!(class = %type_class_name, "skipping blacklisted type");
            return;
        }
        if header.super_name.map(internal_to_class_name).as_deref() != Some(OBJECT_CLASS_NAME) {
            trace!(class = %type_class_name, "skipping type with a superclass");
            return;
        }
        let Some(signature) = header.signature else {
            return;
        };
        match type_parameters(signature) {
            Ok(parameters) if parameters.is_empty() => {}
            Ok(_) => {
                trace!(class = %type_class_name, "skipping generic type");
                return;
            }
            Err(e) => {
                trace!(class = %type_class_name, error = %e, "skipping type with unreadable signature");
                return;
            }
        }

        self.extended_type = Some(type_class_name);
    }

    fn visit_method(&mut self, method: &MethodHeader<'_>) {
        let Some(extended_type) = &self.extended_type else {
            return;
        };
        if self
            .config
            .method_name_blacklist
            .iter()
            .any(|name| name == method.name)
            || !method.is_public()
        {
            return;
        }
        let Some(signature) = method.signature else {
            return;
        };
        let Ok(descriptor) = MethodDescriptor::parse(method.descriptor) else {
            return;
        };
        if !is_single_class_parameter(&descriptor) {
            return;
        }
        let Some(type_parameter) = type_parameters(signature)
            .ok()
            .and_then(single_without_bounds)
        else {
            return;
        };

        let return_class_name = descriptor.return_type.class_name();
        let return_type = if return_class_name == OBJECT_CLASS_NAME {
            type_parameter.name.clone()
        } else {
            format!("{}<{}>", return_class_name, type_parameter.name)
        };

        trace!(
            class = %extended_type,
            method = method.name,
            "found reified type parameter candidate"
        );
        self.extensions.push(ReifiedTypeParametersExtensionFunction {
            type_parameter_name: type_parameter.name,
            extended_type_type_parameters: Vec::new(),
            extended_type: extended_type.clone(),
            function_name: method.name.to_string(),
            return_type,
            parameters: Vec::new(),
        });
    }
}

fn is_single_class_parameter(descriptor: &MethodDescriptor) -> bool {
    matches!(
        descriptor.arguments.as_slice(),
        [argument @ JavaType::Object(_)] if argument.class_name() == CLASS_CLASS_NAME
    )
}

fn single_without_bounds(parameters: Vec<TypeParameter>) -> Option<TypeParameter> {
    match <[TypeParameter; 1]>::try_from(parameters) {
        Ok([parameter]) if parameter.bounds.is_none() => Some(parameter),
        _ => None,
    }
}
