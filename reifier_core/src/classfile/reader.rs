//! Class file decoding (JVMS chapter 4).

use super::{ClassHeader, ClassVisitor, MethodHeader};

const MAGIC: u32 = 0xCAFE_BABE;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

const SIGNATURE_ATTRIBUTE: &str = "Signature";

/// Error raised when class bytes do not follow the class file layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFormatError {
    pub message: String,
    pub offset: usize,
}

impl ClassFormatError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for ClassFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ClassFormatError {}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class(u16),
    Other,
    /// Index 0 and the second slot of `Long`/`Double` entries.
    Unusable,
}

/// A method as recorded in the class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

/// The decoded subset of one class file.
#[derive(Debug, Clone)]
pub struct ClassReader {
    minor_version: u16,
    major_version: u16,
    access: u16,
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    methods: Vec<MethodInfo>,
}

impl ClassReader {
    pub fn new(bytes: &[u8]) -> Result<Self, ClassFormatError> {
        let mut cursor = Cursor::new(bytes);

        let magic = cursor.u4()?;
        if magic != MAGIC {
            return Err(ClassFormatError::new(
                format!("bad magic number {:#010x}", magic),
                0,
            ));
        }
        let minor_version = cursor.u2()?;
        let major_version = cursor.u2()?;

        let pool = ConstantPool::read(&mut cursor)?;

        let access = cursor.u2()?;
        let name = pool.class_name(cursor.u2()?, cursor.pos)?.to_string();
        let super_index = cursor.u2()?;
        let super_name = if super_index == 0 {
            None
        } else {
            Some(pool.class_name(super_index, cursor.pos)?.to_string())
        };

        let interface_count = cursor.u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            let index = cursor.u2()?;
            interfaces.push(pool.class_name(index, cursor.pos)?.to_string());
        }

        let field_count = cursor.u2()?;
        for _ in 0..field_count {
            // access, name, descriptor
            cursor.skip(6)?;
            skip_attributes(&mut cursor)?;
        }

        let method_count = cursor.u2()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            let access = cursor.u2()?;
            let name = pool.utf8(cursor.u2()?, cursor.pos)?.to_string();
            let descriptor = pool.utf8(cursor.u2()?, cursor.pos)?.to_string();
            let signature = read_signature_attribute(&mut cursor, &pool)?;
            methods.push(MethodInfo {
                access,
                name,
                descriptor,
                signature,
            });
        }

        let signature = read_signature_attribute(&mut cursor, &pool)?;

        Ok(Self {
            minor_version,
            major_version,
            access,
            name,
            super_name,
            interfaces,
            signature,
            methods,
        })
    }

    /// Drives `visitor` over the class and then each of its methods.
    pub fn accept<V: ClassVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit(&ClassHeader {
            major_version: self.major_version,
            minor_version: self.minor_version,
            access: self.access,
            name: &self.name,
            signature: self.signature.as_deref(),
            super_name: self.super_name.as_deref(),
            interfaces: &self.interfaces,
        });
        for method in &self.methods {
            visitor.visit_method(&MethodHeader {
                access: method.access,
                name: &method.name,
                descriptor: &method.descriptor,
                signature: method.signature.as_deref(),
            });
        }
        visitor.visit_end();
    }

    pub fn access(&self) -> u16 {
        self.access
    }

    /// Internal name of this class.
    pub fn class_name(&self) -> &str {
        &self.name
    }

    pub fn super_name(&self) -> Option<&str> {
        self.super_name.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }
}

/// Reads an attribute table, returning the value of a `Signature` attribute if any.
fn read_signature_attribute(
    cursor: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Option<String>, ClassFormatError> {
    let count = cursor.u2()?;
    let mut signature = None;
    for _ in 0..count {
        let name = pool.utf8(cursor.u2()?, cursor.pos)?;
        let length = cursor.u4()? as usize;
        if name == SIGNATURE_ATTRIBUTE && length == 2 {
            let index = cursor.u2()?;
            signature = Some(pool.utf8(index, cursor.pos)?.to_string());
        } else {
            cursor.skip(length)?;
        }
    }
    Ok(signature)
}

fn skip_attributes(cursor: &mut Cursor<'_>) -> Result<(), ClassFormatError> {
    let count = cursor.u2()?;
    for _ in 0..count {
        cursor.skip(2)?;
        let length = cursor.u4()? as usize;
        cursor.skip(length)?;
    }
    Ok(())
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ClassFormatError> {
        let count = cursor.u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let offset = cursor.pos;
            let tag = cursor.u1()?;
            match tag {
                TAG_UTF8 => {
                    let length = cursor.u2()? as usize;
                    let bytes = cursor.take(length)?;
                    entries.push(Constant::Utf8(decode_modified_utf8(bytes, offset)?));
                }
                TAG_CLASS => entries.push(Constant::Class(cursor.u2()?)),
                TAG_INTEGER | TAG_FLOAT => {
                    cursor.skip(4)?;
                    entries.push(Constant::Other);
                }
                TAG_LONG | TAG_DOUBLE => {
                    cursor.skip(8)?;
                    entries.push(Constant::Other);
                    entries.push(Constant::Unusable);
                }
                TAG_STRING | TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                    cursor.skip(2)?;
                    entries.push(Constant::Other);
                }
                TAG_METHOD_HANDLE => {
                    cursor.skip(3)?;
                    entries.push(Constant::Other);
                }
                TAG_FIELDREF
                | TAG_METHODREF
                | TAG_INTERFACE_METHODREF
                | TAG_NAME_AND_TYPE
                | TAG_DYNAMIC
                | TAG_INVOKE_DYNAMIC => {
                    cursor.skip(4)?;
                    entries.push(Constant::Other);
                }
                other => {
                    return Err(ClassFormatError::new(
                        format!("invalid constant pool tag {}", other),
                        offset,
                    ));
                }
            }
        }

        Ok(Self { entries })
    }

    fn utf8(&self, index: u16, offset: usize) -> Result<&str, ClassFormatError> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(value)) => Ok(value),
            _ => Err(ClassFormatError::new(
                format!("constant #{} is not a Utf8 entry", index),
                offset,
            )),
        }
    }

    fn class_name(&self, index: u16, offset: usize) -> Result<&str, ClassFormatError> {
        match self.entries.get(index as usize) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index, offset),
            _ => Err(ClassFormatError::new(
                format!("constant #{} is not a Class entry", index),
                offset,
            )),
        }
    }
}

/// Decodes the JVM's modified UTF-8 (`\0` as two bytes, supplementary
/// characters as surrogate pairs).
fn decode_modified_utf8(bytes: &[u8], offset: usize) -> Result<String, ClassFormatError> {
    if let Ok(value) = std::str::from_utf8(bytes) {
        return Ok(value.to_string());
    }

    let invalid = || ClassFormatError::new("invalid modified UTF-8 constant", offset);
    let continuation = |index: usize| -> Result<u16, ClassFormatError> {
        match bytes.get(index) {
            Some(byte) if byte & 0xC0 == 0x80 => Ok((byte & 0x3F) as u16),
            _ => Err(invalid()),
        }
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte & 0x80 == 0 {
            units.push(byte as u16);
            i += 1;
        } else if byte & 0xE0 == 0xC0 {
            units.push(((byte & 0x1F) as u16) << 6 | continuation(i + 1)?);
            i += 2;
        } else if byte & 0xF0 == 0xE0 {
            units.push(
                ((byte & 0x0F) as u16) << 12 | continuation(i + 1)? << 6 | continuation(i + 2)?,
            );
            i += 3;
        } else {
            return Err(invalid());
        }
    }

    String::from_utf16(&units).map_err(|_| invalid())
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ClassFormatError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| ClassFormatError::new("unexpected end of class file", self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassFormatError> {
        self.take(len).map(|_| ())
    }

    fn u1(&mut self) -> Result<u8, ClassFormatError> {
        Ok(self.take(1)?[0])
    }

    fn u2(&mut self) -> Result<u16, ClassFormatError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u4(&mut self) -> Result<u32, ClassFormatError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
