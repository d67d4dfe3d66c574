//! Integer and length encodings of X.891 (Section C.21 ff.).
//!
//! Vocabulary indices are handed out 1-based. On the wire the value is
//! `index - 1`, split into small/medium/large ranges whose discriminator
//! bits share the octet with the flags that precede the integer. All
//! functions here take the 1-based index (or the non-zero length) and
//! subtract the range base themselves.

use crate::constants::*;
use crate::octets::OctetWriter;
use crate::{Error, Result};

#[inline]
fn zero_based(index: u32) -> Result<u32> {
    match index.checked_sub(1) {
        Some(i) if i < INTEGER_MAXIMUM => Ok(i),
        Some(_) => Err(Error::IntegerOverflow(u64::from(index))),
        None => Err(Error::usage("index 0 is never assigned")),
    }
}

#[inline]
fn non_zero_length(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(0) => Err(Error::usage("length of a non-empty string is zero")),
        Ok(l) => Ok(l),
        Err(_) => Err(Error::IntegerOverflow(len as u64)),
    }
}

#[inline]
fn write_u16(w: &mut OctetWriter, v: u32) {
    w.write((v >> 8) as u8);
    w.write(v as u8);
}

#[inline]
fn write_u24(w: &mut OctetWriter, v: u32) {
    w.write((v >> 16) as u8);
    write_u16(w, v);
}

#[inline]
fn write_u32(w: &mut OctetWriter, v: u32) {
    w.write_bytes(&v.to_be_bytes());
}

/// Index on the second bit, first bit set (identifying string hit, C.13).
pub fn write_on_second_bit_first_bit_one(w: &mut OctetWriter, index: u32) -> Result<()> {
    write_on_second_bit(w, 0x80, index)
}

/// Index on the second bit, first bit zero (attribute qualified name, C.4).
pub fn write_on_second_bit_first_bit_zero(w: &mut OctetWriter, index: u32) -> Result<()> {
    write_on_second_bit(w, 0x00, index)
}

fn write_on_second_bit(w: &mut OctetWriter, first: u8, index: u32) -> Result<()> {
    let i = zero_based(index)?;
    if i < INTEGER_2ND_BIT_SMALL_LIMIT {
        w.write(first | i as u8);
    } else if i < INTEGER_2ND_BIT_MEDIUM_LIMIT {
        let v = i - INTEGER_2ND_BIT_SMALL_LIMIT;
        w.write(first | INTEGER_2ND_BIT_MEDIUM_FLAG | (v >> 8) as u8);
        w.write(v as u8);
    } else {
        let v = i - INTEGER_2ND_BIT_MEDIUM_LIMIT;
        w.write(first | INTEGER_2ND_BIT_LARGE_FLAG | (v >> 16) as u8);
        write_u16(w, v);
    }
    Ok(())
}

/// Index on the third bit; `b` carries the first two bits (element name, C.18).
pub fn write_on_third_bit(w: &mut OctetWriter, b: u8, index: u32) -> Result<()> {
    let i = zero_based(index)?;
    if i < INTEGER_3RD_BIT_SMALL_LIMIT {
        w.write(b | i as u8);
    } else if i < INTEGER_3RD_BIT_MEDIUM_LIMIT {
        let v = i - INTEGER_3RD_BIT_SMALL_LIMIT;
        w.write(b | INTEGER_3RD_BIT_MEDIUM_FLAG | (v >> 8) as u8);
        w.write(v as u8);
    } else if i < INTEGER_3RD_BIT_LARGE_LIMIT {
        let v = i - INTEGER_3RD_BIT_MEDIUM_LIMIT;
        w.write(b | INTEGER_3RD_BIT_LARGE_FLAG | (v >> 16) as u8);
        write_u16(w, v);
    } else {
        let v = i - INTEGER_3RD_BIT_LARGE_LIMIT;
        w.write(b | INTEGER_3RD_BIT_LARGE_LARGE_FLAG);
        write_u24(w, v);
    }
    Ok(())
}

/// Index on the fourth bit; `b` carries the first three bits (character chunk, C.15).
pub fn write_on_fourth_bit(w: &mut OctetWriter, b: u8, index: u32) -> Result<()> {
    let i = zero_based(index)?;
    if i < INTEGER_4TH_BIT_SMALL_LIMIT {
        w.write(b | i as u8);
    } else if i < INTEGER_4TH_BIT_MEDIUM_LIMIT {
        let v = i - INTEGER_4TH_BIT_SMALL_LIMIT;
        w.write(b | INTEGER_4TH_BIT_MEDIUM_FLAG | (v >> 8) as u8);
        w.write(v as u8);
    } else if i < INTEGER_4TH_BIT_LARGE_LIMIT {
        let v = i - INTEGER_4TH_BIT_MEDIUM_LIMIT;
        w.write(b | INTEGER_4TH_BIT_LARGE_FLAG | (v >> 16) as u8);
        write_u16(w, v);
    } else {
        let v = i - INTEGER_4TH_BIT_LARGE_LIMIT;
        w.write(b | INTEGER_4TH_BIT_LARGE_LARGE_FLAG);
        write_u24(w, v);
    }
    Ok(())
}

/// Octet string length on the second bit, first bit zero (C.22).
pub fn write_length_on_second_bit(w: &mut OctetWriter, len: usize) -> Result<()> {
    let l = non_zero_length(len)?;
    if l < OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT {
        w.write((l - 1) as u8);
    } else if l < OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT {
        w.write(OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG);
        w.write((l - OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT) as u8);
    } else {
        w.write(OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG);
        write_u32(w, l - OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT);
    }
    Ok(())
}

/// Octet string length on the fifth bit; `b` carries the first four bits (C.23).
pub fn write_length_on_fifth_bit(w: &mut OctetWriter, b: u8, len: usize) -> Result<()> {
    let l = non_zero_length(len)?;
    if l < OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT {
        w.write(b | (l - 1) as u8);
    } else if l < OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT {
        w.write(b | OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG);
        w.write((l - OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT) as u8);
    } else {
        w.write(b | OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG);
        write_u32(w, l - OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT);
    }
    Ok(())
}

/// Octet string length on the seventh bit; `b` carries the first six bits (C.24).
pub fn write_length_on_seventh_bit(w: &mut OctetWriter, b: u8, len: usize) -> Result<()> {
    let l = non_zero_length(len)?;
    if l < OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT {
        w.write(b | (l - 1) as u8);
    } else if l < OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT {
        w.write(b | OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG);
        w.write((l - OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT) as u8);
    } else {
        w.write(b | OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG);
        write_u32(w, l - OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT);
    }
    Ok(())
}
