//! Generic signature parsing (JVMS §4.7.9.1), limited to formal type parameters.
//!
//! Class bounds are read and dropped. Interface bounds contribute every class
//! type named inside them, type arguments included, in visit order. A type
//! parameter whose only bound is a class bound (`<T:Ljava/lang/Object;>`, how
//! `javac` writes a plain `<T>`) therefore comes out unbounded.

use crate::classfile::internal_to_class_name;
use serde::Serialize;

/// One formal type parameter of a class or method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParameter {
    pub name: String,
    /// Interface bounds joined with `", "`, absent when there are none.
    pub bounds: Option<String>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>, bounds: Option<String>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Error for signatures that break the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureError {
    pub signature: String,
    pub message: String,
    pub position: usize,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid signature '{}' at {}: {}",
            self.signature, self.position, self.message
        )
    }
}

impl std::error::Error for SignatureError {}

/// Parses the formal type parameters declared by a class or method signature.
///
/// Returns an empty list when the signature declares none.
pub fn type_parameters(signature: &str) -> Result<Vec<TypeParameter>, SignatureError> {
    let mut collector = TypeParametersCollector::default();
    SignatureParser::new(signature).formal_type_parameters(&mut collector)?;
    Ok(collector.finish())
}

/// Bound names per type parameter, in declaration order.
#[derive(Default)]
struct TypeParametersCollector {
    state: Vec<(String, Vec<String>)>,
    current: usize,
}

impl TypeParametersCollector {
    fn visit_formal_type_parameter(&mut self, name: &str) {
        match self.state.iter().position(|(existing, _)| existing == name) {
            Some(index) => {
                self.state[index].1.clear();
                self.current = index;
            }
            None => {
                self.state.push((name.to_string(), Vec::new()));
                self.current = self.state.len() - 1;
            }
        }
    }

    fn visit_interface_bound(&mut self, class_types: Vec<String>) {
        if let Some((_, bounds)) = self.state.get_mut(self.current) {
            bounds.extend(class_types);
        }
    }

    fn finish(self) -> Vec<TypeParameter> {
        self.state
            .into_iter()
            .map(|(name, bounds)| {
                let bounds = if bounds.is_empty() {
                    None
                } else {
                    Some(bounds.join(", "))
                };
                TypeParameter { name, bounds }
            })
            .collect()
    }
}

struct SignatureParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn formal_type_parameters(
        &mut self,
        collector: &mut TypeParametersCollector,
    ) -> Result<(), SignatureError> {
        if self.peek() != Some(b'<') {
            return Ok(());
        }
        self.pos += 1;

        loop {
            let name = self.identifier(b":")?;
            collector.visit_formal_type_parameter(name);
            self.expect(b':')?;

            if matches!(self.peek(), Some(b'L' | b'T' | b'[')) {
                let mut discarded = Vec::new();
                self.reference_type(&mut discarded)?;
            }

            while self.peek() == Some(b':') {
                self.pos += 1;
                let mut class_types = Vec::new();
                self.reference_type(&mut class_types)?;
                collector.visit_interface_bound(class_types);
            }

            if self.peek() == Some(b'>') {
                self.pos += 1;
                return Ok(());
            }
        }
    }

    /// ClassTypeSignature, TypeVariableSignature or ArrayTypeSignature.
    fn reference_type(&mut self, class_types: &mut Vec<String>) -> Result<(), SignatureError> {
        match self.peek() {
            Some(b'L') => self.class_type(class_types),
            Some(b'T') => {
                self.pos += 1;
                self.identifier(b";")?;
                self.expect(b';')
            }
            Some(b'[') => {
                self.pos += 1;
                match self.peek() {
                    Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => {
                        self.pos += 1;
                        Ok(())
                    }
                    _ => self.reference_type(class_types),
                }
            }
            _ => Err(self.error("expected a reference type")),
        }
    }

    fn class_type(&mut self, class_types: &mut Vec<String>) -> Result<(), SignatureError> {
        self.expect(b'L')?;
        let name = self.identifier(b"<.;")?;
        class_types.push(internal_to_class_name(name));
        if self.peek() == Some(b'<') {
            self.type_arguments(class_types)?;
        }
        // Inner class suffixes are not collected, only their type arguments.
        while self.peek() == Some(b'.') {
            self.pos += 1;
            self.identifier(b"<.;")?;
            if self.peek() == Some(b'<') {
                self.type_arguments(class_types)?;
            }
        }
        self.expect(b';')
    }

    fn type_arguments(&mut self, class_types: &mut Vec<String>) -> Result<(), SignatureError> {
        self.expect(b'<')?;
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'*') => self.pos += 1,
                Some(b'+' | b'-') => {
                    self.pos += 1;
                    self.reference_type(class_types)?;
                }
                Some(_) => self.reference_type(class_types)?,
                None => return Err(self.error("unterminated type arguments")),
            }
        }
    }

    /// Reads a non-empty run of characters up to one of `terminators`.
    fn identifier(&mut self, terminators: &[u8]) -> Result<&'a str, SignatureError> {
        let source = self.source;
        let start = self.pos;
        let length = source.as_bytes()[start..]
            .iter()
            .position(|byte| terminators.contains(byte))
            .ok_or_else(|| self.error("unexpected end of signature"))?;
        if length == 0 {
            return Err(self.error("empty identifier"));
        }
        self.pos += length;
        Ok(&source[start..start + length])
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<(), SignatureError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected as char)))
        }
    }

    fn error(&self, message: &str) -> SignatureError {
        SignatureError {
            signature: self.source.to_string(),
            message: message.to_string(),
            position: self.pos,
        }
    }
}
