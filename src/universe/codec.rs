//! §3.8, §6.1 — Pattern Universe File binary codec.
//!
//! Wire format, bit-for-bit as the reference serializer/deserializer:
//! header `{magic: u32, version: u32, patternCount: u32}` then
//! `patternCount` templates, each `{nameLen: u16, nameBytes, conditionCount:
//! u8, reserved: u8, conditions[]}`, each condition 5 bytes
//! `{lhsType, lhsOffset, op, rhsType, rhsOffset}`. All little-endian.

use std::io::{Read, Write};

use crate::error::CodecError;
use crate::pattern::component::{ComponentType, PriceComponentDescriptor};
use crate::pattern::condition::{ComparisonOperator, PatternCondition};
use crate::pattern::template::PatternTemplate;

pub const MAGIC: u32 = 0x5041_5455; // "PATU"
pub const VERSION: u32 = 1;

pub fn write_universe<W: Write>(out: &mut W, templates: &[PatternTemplate]) -> Result<(), CodecError> {
    write_u32(out, MAGIC)?;
    write_u32(out, VERSION)?;
    write_u32(out, templates.len() as u32)?;
    for template in templates {
        write_template(out, template)?;
    }
    Ok(())
}

fn write_template<W: Write>(out: &mut W, template: &PatternTemplate) -> Result<(), CodecError> {
    let name_bytes = template.name().as_bytes();
    write_u16(out, name_bytes.len() as u16)?;
    out.write_all(name_bytes).map_err(|_| CodecError::ShortRead {
        expected: name_bytes.len(),
        got: 0,
    })?;

    let conditions = template.conditions();
    write_u8(out, conditions.len() as u8)?;
    write_u8(out, 0)?; // reserved

    for condition in conditions {
        write_u8(out, condition.lhs().component_type() as u8)?;
        write_u8(out, condition.lhs().bar_offset())?;
        write_u8(out, condition.op() as u8)?;
        write_u8(out, condition.rhs().component_type() as u8)?;
        write_u8(out, condition.rhs().bar_offset())?;
    }
    Ok(())
}

pub fn read_universe<R: Read>(input: &mut R) -> Result<Vec<PatternTemplate>, CodecError> {
    let magic = read_u32(input)?;
    if magic != MAGIC {
        return Err(CodecError::BadMagic {
            expected: MAGIC,
            found: magic,
        });
    }
    let version = read_u32(input)?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let pattern_count = read_u32(input)? as usize;

    let mut templates = Vec::with_capacity(pattern_count);
    for index in 0..pattern_count {
        templates.push(read_template(input, index)?);
    }
    Ok(templates)
}

fn read_template<R: Read>(input: &mut R, pattern_index: usize) -> Result<PatternTemplate, CodecError> {
    let name_len = read_u16(input)? as usize;
    let mut name_buf = vec![0u8; name_len];
    input
        .read_exact(&mut name_buf)
        .map_err(|_| CodecError::ShortRead {
            expected: name_len,
            got: 0,
        })?;
    let name = String::from_utf8(name_buf).map_err(|_| CodecError::InvalidName { pattern_index })?;

    let mut template = PatternTemplate::new(name);

    let condition_count = read_u8(input)?;
    let _reserved = read_u8(input)?;

    for _ in 0..condition_count {
        let lhs_type = read_u8(input)?;
        let lhs_offset = read_u8(input)?;
        let op = read_u8(input)?;
        let rhs_type = read_u8(input)?;
        let rhs_offset = read_u8(input)?;

        let lhs_type = ComponentType::from_u8(lhs_type)
            .ok_or(CodecError::TruncatedCondition { pattern_index })?;
        let rhs_type = ComponentType::from_u8(rhs_type)
            .ok_or(CodecError::TruncatedCondition { pattern_index })?;
        let op = ComparisonOperator::from_u8(op).ok_or(CodecError::TruncatedCondition { pattern_index })?;

        template.add_condition(PatternCondition::new(
            PriceComponentDescriptor::new(lhs_type, lhs_offset),
            op,
            PriceComponentDescriptor::new(rhs_type, rhs_offset),
        ));
    }

    Ok(template)
}

fn write_u8<W: Write>(out: &mut W, value: u8) -> Result<(), CodecError> {
    out.write_all(&[value]).map_err(|_| CodecError::ShortRead {
        expected: 1,
        got: 0,
    })
}

fn write_u16<W: Write>(out: &mut W, value: u16) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())
        .map_err(|_| CodecError::ShortRead { expected: 2, got: 0 })
}

fn write_u32<W: Write>(out: &mut W, value: u32) -> Result<(), CodecError> {
    out.write_all(&value.to_le_bytes())
        .map_err(|_| CodecError::ShortRead { expected: 4, got: 0 })
}

fn read_u8<R: Read>(input: &mut R) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    input
        .read_exact(&mut buf)
        .map_err(|_| CodecError::ShortRead { expected: 1, got: 0 })?;
    Ok(buf[0])
}

fn read_u16<R: Read>(input: &mut R) -> Result<u16, CodecError> {
    let mut buf = [0u8; 2];
    input
        .read_exact(&mut buf)
        .map_err(|_| CodecError::ShortRead { expected: 2, got: 0 })?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    input
        .read_exact(&mut buf)
        .map_err(|_| CodecError::ShortRead { expected: 4, got: 0 })?;
    Ok(u32::from_le_bytes(buf))
}
