//! Field and method descriptors.

/// Error for descriptors that do not follow JVMS §4.3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorError {
    pub descriptor: String,
    pub message: String,
}

impl std::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid descriptor '{}': {}", self.descriptor, self.message)
    }
}

impl std::error::Error for DescriptorError {}

/// A Java type as written in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Void,
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Float,
    Long,
    Double,
    Array(Box<JavaType>),
    /// Internal name, e.g. `java/lang/Class`.
    Object(String),
}

impl JavaType {
    /// Parses a single field descriptor such as `Ljava/lang/String;` or `[I`.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut parser = DescriptorParser::new(descriptor);
        let java_type = parser.field_type()?;
        if !parser.is_at_end() {
            return Err(parser.error("trailing characters"));
        }
        Ok(java_type)
    }

    /// The Java source name: `int`, `java.lang.String`, `java.lang.String[][]`.
    pub fn class_name(&self) -> String {
        match self {
            JavaType::Void => "void".to_string(),
            JavaType::Boolean => "boolean".to_string(),
            JavaType::Char => "char".to_string(),
            JavaType::Byte => "byte".to_string(),
            JavaType::Short => "short".to_string(),
            JavaType::Int => "int".to_string(),
            JavaType::Float => "float".to_string(),
            JavaType::Long => "long".to_string(),
            JavaType::Double => "double".to_string(),
            JavaType::Array(element) => format!("{}[]", element.class_name()),
            JavaType::Object(internal_name) => internal_to_class_name(internal_name),
        }
    }
}

/// Argument and return types of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub arguments: Vec<JavaType>,
    pub return_type: JavaType,
}

impl MethodDescriptor {
    /// Parses a method descriptor such as `(Ljava/lang/Class;I)V`.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut parser = DescriptorParser::new(descriptor);
        parser.expect(b'(')?;
        let mut arguments = Vec::new();
        while parser.peek() != Some(b')') {
            arguments.push(parser.field_type()?);
        }
        parser.expect(b')')?;
        let return_type = if parser.peek() == Some(b'V') {
            parser.pos += 1;
            JavaType::Void
        } else {
            parser.field_type()?
        };
        if !parser.is_at_end() {
            return Err(parser.error("trailing characters"));
        }
        Ok(Self {
            arguments,
            return_type,
        })
    }
}

/// Converts an internal name (`a/b/C`) to its dotted form (`a.b.C`).
pub fn internal_to_class_name(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

struct DescriptorParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn expect(&mut self, expected: u8) -> Result<(), DescriptorError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected as char)))
        }
    }

    fn field_type(&mut self) -> Result<JavaType, DescriptorError> {
        let tag = self
            .peek()
            .ok_or_else(|| self.error("unexpected end of descriptor"))?;
        self.pos += 1;
        let java_type = match tag {
            b'Z' => JavaType::Boolean,
            b'C' => JavaType::Char,
            b'B' => JavaType::Byte,
            b'S' => JavaType::Short,
            b'I' => JavaType::Int,
            b'F' => JavaType::Float,
            b'J' => JavaType::Long,
            b'D' => JavaType::Double,
            b'[' => JavaType::Array(Box::new(self.field_type()?)),
            b'L' => {
                let source = self.source;
                let rest = &source[self.pos..];
                let end = rest
                    .find(';')
                    .ok_or_else(|| self.error("unterminated class type"))?;
                if end == 0 {
                    return Err(self.error("empty class name"));
                }
                self.pos += end + 1;
                JavaType::Object(rest[..end].to_string())
            }
            other => {
                return Err(self.error(&format!("unexpected '{}'", other as char)));
            }
        };
        Ok(java_type)
    }

    fn error(&self, message: &str) -> DescriptorError {
        DescriptorError {
            descriptor: self.source.to_string(),
            message: format!("{} at {}", message, self.pos),
        }
    }
}
