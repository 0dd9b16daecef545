//! Binary record layout of the persistent symbol store.
//!
//! Both files open with a little-endian `u32` format version. The skeleton
//! file then holds one fixed-shape record per class; the body file holds
//! one variable-length record per class, delimited exactly by the seek
//! pointer and length stored in the matching skeleton record. Strings are
//! `u16`-length-prefixed UTF-8; every variable-length list is preceded by
//! its explicit count.

use std::io::Read;

use crate::base::Modifiers;
use crate::core::Interner;
use crate::symbols::{ClassBody, ConstructorSymbol, FieldSymbol, MethodSymbol, Parameter, TypeName};

use super::StoreError;

/// Bumped whenever a record layout changes. A mismatch on load means the
/// store must be reset, never partially decoded.
pub const STORE_VERSION: u32 = 4;

/// One entry of the eagerly loaded skeleton section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkeletonRecord {
    pub full_name: String,
    /// Length of the package prefix within `full_name` (0 = unnamed package).
    pub package_len: u16,
    /// Modifier bits; [`Modifiers::INTERFACE`] marks interfaces.
    pub modifiers: Modifiers,
    /// Seek position of the body record inside the body file.
    pub body_seek: u64,
    /// Exact length of the body record in bytes.
    pub body_len: u32,
}

// ============================================================================
// Primitive writers (all little-endian)
// ============================================================================

pub fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_str(buf: &mut Vec<u8>, value: &str) -> Result<(), StoreError> {
    let len = u16::try_from(value.len())
        .map_err(|_| StoreError::InvalidRecord(format!("string too long: {} bytes", value.len())))?;
    put_u16(buf, len);
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

fn put_count(buf: &mut Vec<u8>, len: usize, what: &str) -> Result<(), StoreError> {
    let count = u16::try_from(len)
        .map_err(|_| StoreError::InvalidRecord(format!("too many {what}: {len}")))?;
    put_u16(buf, count);
    Ok(())
}

// ============================================================================
// Primitive readers
// ============================================================================

pub fn read_u16(r: &mut impl Read) -> Result<u16, StoreError> {
    let mut bytes = [0u8; 2];
    r.read_exact(&mut bytes).map_err(short_read)?;
    Ok(u16::from_le_bytes(bytes))
}

pub fn read_u32(r: &mut impl Read) -> Result<u32, StoreError> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes).map_err(short_read)?;
    Ok(u32::from_le_bytes(bytes))
}

pub fn read_u64(r: &mut impl Read) -> Result<u64, StoreError> {
    let mut bytes = [0u8; 8];
    r.read_exact(&mut bytes).map_err(short_read)?;
    Ok(u64::from_le_bytes(bytes))
}

pub fn read_i32(r: &mut impl Read) -> Result<i32, StoreError> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes).map_err(short_read)?;
    Ok(i32::from_le_bytes(bytes))
}

pub fn read_str(r: &mut impl Read, interner: &mut Interner) -> Result<crate::core::IStr, StoreError> {
    let len = read_u16(r)? as usize;
    let mut bytes = vec![0u8; len];
    r.read_exact(&mut bytes).map_err(short_read)?;
    let text = String::from_utf8(bytes)
        .map_err(|err| StoreError::InvalidRecord(format!("invalid UTF-8 string: {err}")))?;
    Ok(interner.intern_string(text))
}

fn short_read(err: std::io::Error) -> StoreError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        StoreError::Truncated
    } else {
        StoreError::Io(err)
    }
}

// ============================================================================
// Skeleton records
// ============================================================================

pub fn encode_skeleton(record: &SkeletonRecord, buf: &mut Vec<u8>) -> Result<(), StoreError> {
    put_str(buf, &record.full_name)?;
    put_u16(buf, record.package_len);
    put_u16(buf, record.modifiers.bits());
    put_u64(buf, record.body_seek);
    put_u32(buf, record.body_len);
    Ok(())
}

pub fn decode_skeleton(
    r: &mut impl Read,
    interner: &mut Interner,
) -> Result<SkeletonRecord, StoreError> {
    let full_name = read_str(r, interner)?;
    let package_len = read_u16(r)?;
    let modifiers = Modifiers::new(read_u16(r)?);
    let body_seek = read_u64(r)?;
    let body_len = read_u32(r)?;
    if (package_len as usize) > full_name.len() {
        return Err(StoreError::InvalidRecord(format!(
            "package length {package_len} exceeds name '{full_name}'"
        )));
    }
    Ok(SkeletonRecord {
        full_name: full_name.to_string(),
        package_len,
        modifiers,
        body_seek,
        body_len,
    })
}

// ============================================================================
// Body records
// ============================================================================

fn put_type(buf: &mut Vec<u8>, ty: &TypeName) -> Result<(), StoreError> {
    put_str(buf, &ty.name)?;
    let depth = u8::try_from(ty.array_depth)
        .map_err(|_| StoreError::InvalidRecord(format!("array depth too large: {}", ty.array_depth)))?;
    buf.push(depth);
    Ok(())
}

fn read_type(r: &mut impl Read, interner: &mut Interner) -> Result<TypeName, StoreError> {
    let name = read_str(r, interner)?;
    let mut depth = [0u8; 1];
    r.read_exact(&mut depth).map_err(short_read)?;
    Ok(TypeName::new(name, depth[0] as u32))
}

fn put_parameters(buf: &mut Vec<u8>, parameters: &[Parameter]) -> Result<(), StoreError> {
    put_count(buf, parameters.len(), "parameters")?;
    for parameter in parameters {
        put_str(buf, &parameter.name)?;
        put_type(buf, &parameter.ty)?;
    }
    Ok(())
}

fn read_parameters(r: &mut impl Read, interner: &mut Interner) -> Result<Vec<Parameter>, StoreError> {
    let count = read_u16(r)? as usize;
    let mut parameters = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_str(r, interner)?;
        let ty = read_type(r, interner)?;
        parameters.push(Parameter { name, ty });
    }
    Ok(parameters)
}

fn put_names(buf: &mut Vec<u8>, names: &[crate::core::IStr], what: &str) -> Result<(), StoreError> {
    put_count(buf, names.len(), what)?;
    for name in names {
        put_str(buf, name)?;
    }
    Ok(())
}

fn read_names(r: &mut impl Read, interner: &mut Interner) -> Result<Vec<crate::core::IStr>, StoreError> {
    let count = read_u16(r)? as usize;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(read_str(r, interner)?);
    }
    Ok(names)
}

pub fn encode_body(body: &ClassBody, buf: &mut Vec<u8>) -> Result<(), StoreError> {
    put_i32(buf, body.declaration_offset);
    put_str(buf, body.superclass.as_deref().unwrap_or(""))?;
    put_names(buf, &body.interfaces, "interfaces")?;

    put_count(buf, body.fields.len(), "fields")?;
    for field in &body.fields {
        put_str(buf, &field.name)?;
        put_u16(buf, field.modifiers.bits());
        put_type(buf, &field.ty)?;
        put_i32(buf, field.declaration_offset);
    }

    put_count(buf, body.constructors.len(), "constructors")?;
    for constructor in &body.constructors {
        put_u16(buf, constructor.modifiers.bits());
        put_parameters(buf, &constructor.parameters)?;
        put_names(buf, &constructor.throws, "throws")?;
        put_i32(buf, constructor.declaration_offset);
    }

    put_count(buf, body.methods.len(), "methods")?;
    for method in &body.methods {
        put_str(buf, &method.name)?;
        put_u16(buf, method.modifiers.bits());
        put_type(buf, &method.return_type)?;
        put_parameters(buf, &method.parameters)?;
        put_names(buf, &method.throws, "throws")?;
        put_i32(buf, method.declaration_offset);
    }
    Ok(())
}

/// Decode one body record from exactly `bytes`. `owner` is the full name of
/// the class the record belongs to.
pub fn decode_body(
    bytes: &[u8],
    owner: &str,
    interner: &mut Interner,
) -> Result<ClassBody, StoreError> {
    let mut cursor = std::io::Cursor::new(bytes);
    let r = &mut cursor;
    let owner: crate::core::IStr = interner.intern(owner);

    let declaration_offset = read_i32(r)?;
    let superclass = {
        let name = read_str(r, interner)?;
        (!name.is_empty()).then_some(name)
    };
    let interfaces = read_names(r, interner)?;

    let field_count = read_u16(r)? as usize;
    let mut fields = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let name = read_str(r, interner)?;
        let modifiers = Modifiers::new(read_u16(r)?);
        let ty = read_type(r, interner)?;
        let declaration_offset = read_i32(r)?;
        fields.push(FieldSymbol {
            owner: owner.clone(),
            name,
            modifiers,
            ty,
            declaration_offset,
        });
    }

    let constructor_count = read_u16(r)? as usize;
    let mut constructors = Vec::with_capacity(constructor_count);
    for _ in 0..constructor_count {
        let modifiers = Modifiers::new(read_u16(r)?);
        let parameters = read_parameters(r, interner)?;
        let throws = read_names(r, interner)?;
        let declaration_offset = read_i32(r)?;
        constructors.push(ConstructorSymbol {
            owner: owner.clone(),
            modifiers,
            parameters,
            throws,
            declaration_offset,
        });
    }

    let method_count = read_u16(r)? as usize;
    let mut methods = Vec::with_capacity(method_count);
    for _ in 0..method_count {
        let name = read_str(r, interner)?;
        let modifiers = Modifiers::new(read_u16(r)?);
        let return_type = read_type(r, interner)?;
        let parameters = read_parameters(r, interner)?;
        let throws = read_names(r, interner)?;
        let declaration_offset = read_i32(r)?;
        methods.push(MethodSymbol {
            owner: owner.clone(),
            name,
            modifiers,
            parameters,
            return_type,
            throws,
            declaration_offset,
        });
    }

    if (cursor.position() as usize) != bytes.len() {
        return Err(StoreError::InvalidRecord(format!(
            "body record for '{owner}' has {} trailing bytes",
            bytes.len() - cursor.position() as usize
        )));
    }

    Ok(ClassBody {
        declaration_offset,
        superclass,
        interfaces,
        fields,
        constructors,
        methods,
    })
}
