//! PDF object model
//!
//! The handful of object kinds a paginated image document needs: numbers,
//! strings, names, arrays, dictionaries, streams and indirect references,
//! plus a serializer that renders them in PDF syntax.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// A PDF object
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    /// Integer number
    Integer(i64),
    /// Real number
    Real(f64),
    /// Literal string, stored as raw bytes
    String(Vec<u8>),
    /// Name object (written with a leading `/`)
    Name(String),
    /// Array of objects
    Array(Vec<PdfObject>),
    /// Dictionary
    Dictionary(PdfDictionary),
    /// Stream (dictionary + bytes)
    Stream(PdfStream),
    /// Indirect reference to object `n 0 R`
    Reference(u32),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn string(s: impl Into<Vec<u8>>) -> Self {
        PdfObject::String(s.into())
    }

    /// Four-element rectangle array `[llx lly urx ury]`
    pub fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(llx),
            PdfObject::Real(lly),
            PdfObject::Real(urx),
            PdfObject::Real(ury),
        ])
    }

    /// Array of indirect references
    pub fn references(refs: &[u32]) -> Self {
        PdfObject::Array(refs.iter().map(|&r| PdfObject::Reference(r)).collect())
    }
}

impl From<i64> for PdfObject {
    fn from(n: i64) -> Self {
        PdfObject::Integer(n)
    }
}

impl From<u32> for PdfObject {
    fn from(n: u32) -> Self {
        PdfObject::Integer(n as i64)
    }
}

impl From<f64> for PdfObject {
    fn from(n: f64) -> Self {
        PdfObject::Real(n)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(stream: PdfStream) -> Self {
        PdfObject::Stream(stream)
    }
}

/// PDF dictionary with deterministic (sorted) key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with its `/Type` entry already set
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// PDF stream: a dictionary followed by raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Set once a filter has been applied to `data`
    pub compressed: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            compressed: false,
        }
    }

    pub fn with_dict(mut self, dict: PdfDictionary) -> Self {
        for (key, value) in dict.entries {
            self.dict.insert(key, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Writes objects in PDF syntax
pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => write!(self.writer, "{}", n),
            PdfObject::Real(n) => write!(self.writer, "{}", format_real(*n)),
            PdfObject::String(bytes) => self.write_literal(bytes),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                write!(self.writer, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " ")?;
                    }
                    self.write_object(item)?;
                }
                write!(self.writer, "]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Stream(stream) => {
                self.write_dictionary(&stream.dict)?;
                write!(self.writer, "\nstream\n")?;
                self.writer.write_all(&stream.data)?;
                write!(self.writer, "\nendstream")
            }
            PdfObject::Reference(num) => write!(self.writer, "{} 0 R", num),
        }
    }

    fn write_literal(&mut self, bytes: &[u8]) -> io::Result<()> {
        write!(self.writer, "(")?;
        for &byte in bytes {
            match byte {
                b'(' | b')' | b'\\' => write!(self.writer, "\\{}", byte as char)?,
                b'\n' => write!(self.writer, "\\n")?,
                b'\r' => write!(self.writer, "\\r")?,
                0x20..=0x7E => write!(self.writer, "{}", byte as char)?,
                _ => write!(self.writer, "\\{:03o}", byte)?,
            }
        }
        write!(self.writer, ")")
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "/")?;
        for byte in name.bytes() {
            let delimiter = matches!(
                byte,
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
            );
            if (0x21..=0x7E).contains(&byte) && !delimiter {
                write!(self.writer, "{}", byte as char)?;
            } else {
                write!(self.writer, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        write!(self.writer, "<<")?;
        for (key, value) in dict.iter() {
            write!(self.writer, " ")?;
            self.write_name(key)?;
            write!(self.writer, " ")?;
            self.write_object(value)?;
        }
        write!(self.writer, " >>")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Format a real number without exponent notation or trailing zeros
pub(crate) fn format_real(n: f64) -> String {
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    let s = format!("{:.4}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(obj: &PdfObject) -> String {
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(obj).unwrap();
        String::from_utf8(serializer.into_inner()).unwrap()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(render(&PdfObject::Integer(42)), "42");
        assert_eq!(render(&PdfObject::Real(595.0)), "595");
        assert_eq!(render(&PdfObject::Real(28.34646)), "28.3465");
        assert_eq!(render(&PdfObject::Real(-0.00001)), "0");
    }

    #[test]
    fn test_literal_string_escapes() {
        let obj = PdfObject::string("Invoice (copy)\\1");
        assert_eq!(render(&obj), "(Invoice \\(copy\\)\\\\1)");
    }

    #[test]
    fn test_non_ascii_string_is_octal_escaped() {
        let obj = PdfObject::string(vec![b'A', 0xE9]);
        assert_eq!(render(&obj), "(A\\351)");
    }

    #[test]
    fn test_name_escapes_delimiters() {
        assert_eq!(render(&PdfObject::name("Im0")), "/Im0");
        assert_eq!(render(&PdfObject::name("A B")), "/A#20B");
    }

    #[test]
    fn test_dictionary_and_reference() {
        let mut dict = PdfDictionary::typed("Page");
        dict.insert("Parent", PdfObject::Reference(2));
        assert_eq!(render(&dict.into()), "<< /Parent 2 0 R /Type /Page >>");
    }

    #[test]
    fn test_rect_array() {
        assert_eq!(render(&PdfObject::rect(0.0, 0.0, 595.0, 842.0)), "[0 0 595 842]");
    }

    #[test]
    fn test_stream() {
        let stream = PdfStream::new(b"q Q".to_vec());
        let out = render(&stream.into());
        assert!(out.starts_with("<< >>\nstream\nq Q\nendstream"));
    }
}
