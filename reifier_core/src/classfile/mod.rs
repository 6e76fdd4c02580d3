//! Minimal reader for compiled JVM class files.
//!
//! Only the structural subset needed to decide wrapper eligibility is decoded:
//! class and super class names, access flags, method names and descriptors,
//! and `Signature` attributes. Everything else is skipped by length.
//!
//! ```no_run
//! use reifier_core::classfile::{ClassHeader, ClassReader, ClassVisitor, MethodHeader};
//!
//! struct Names(Vec<String>);
//!
//! impl ClassVisitor for Names {
//!     fn visit(&mut self, _header: &ClassHeader<'_>) {}
//!     fn visit_method(&mut self, method: &MethodHeader<'_>) {
//!         self.0.push(method.name.to_string());
//!     }
//! }
//!
//! let bytes = std::fs::read("Project.class").unwrap();
//! let mut names = Names(Vec::new());
//! ClassReader::new(&bytes).unwrap().accept(&mut names);
//! ```

mod reader;
mod types;

pub use reader::{ClassFormatError, ClassReader, MethodInfo};
pub use types::{DescriptorError, JavaType, MethodDescriptor, internal_to_class_name};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;

/// Internal name of the universal base type.
pub const OBJECT_INTERNAL_NAME: &str = "java/lang/Object";

/// Class-level data handed to [`ClassVisitor::visit`].
#[derive(Debug, Clone, Copy)]
pub struct ClassHeader<'a> {
    pub major_version: u16,
    pub minor_version: u16,
    pub access: u16,
    /// Internal name, e.g. `org/gradle/api/Project`.
    pub name: &'a str,
    pub signature: Option<&'a str>,
    /// Absent only for `java/lang/Object` itself and `module-info`.
    pub super_name: Option<&'a str>,
    pub interfaces: &'a [String],
}

/// Method-level data handed to [`ClassVisitor::visit_method`].
#[derive(Debug, Clone, Copy)]
pub struct MethodHeader<'a> {
    pub access: u16,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub signature: Option<&'a str>,
}

impl MethodHeader<'_> {
    pub fn is_public(&self) -> bool {
        self.access & ACC_PUBLIC != 0
    }
}

/// Callbacks driven by [`ClassReader::accept`], in declaration order.
pub trait ClassVisitor {
    fn visit(&mut self, header: &ClassHeader<'_>);

    fn visit_method(&mut self, method: &MethodHeader<'_>);

    fn visit_end(&mut self) {}
}
