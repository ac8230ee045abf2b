//! Print entry points linked into compiled programs
//!
//! One `print` and one `println` function per primitive value kind. They
//! write to stdout and have no failure path: write errors are dropped.

use std::ffi::CStr;
use std::io::{self, Write};
use std::os::raw::{c_char, c_int, c_uint};

/// Significant digits of the `%g` style float rendering
const FLOAT_PRECISION: i32 = 6;

/// Render a float the way C's `%lg` does
pub fn format_float(d: f64) -> String {
    if d.is_nan() {
        return if d.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if d.is_infinite() {
        return if d < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if d == 0.0 {
        return if d.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // the exponent after rounding decides between fixed and scientific form
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, d);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (FLOAT_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, d)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn format_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

fn emit(bytes: &[u8], newline: bool) {
    let mut out = io::stdout().lock();
    let _ = out.write_all(bytes);
    if newline {
        let _ = out.write_all(b"\n");
    }
    let _ = out.flush();
}

/// Bytes of a NUL-terminated string; nothing for a null pointer
///
/// # Safety
///
/// `s` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn c_string<'a>(s: *const c_char) -> &'a [u8] {
    if s.is_null() {
        &[]
    } else {
        CStr::from_ptr(s).to_bytes()
    }
}

#[no_mangle]
pub extern "C" fn __dachs_print_float__(d: f64) {
    emit(format_float(d).as_bytes(), false);
}

#[no_mangle]
pub extern "C" fn __dachs_println_float__(d: f64) {
    emit(format_float(d).as_bytes(), true);
}

#[no_mangle]
pub extern "C" fn __dachs_print_int__(i: c_int) {
    emit(i.to_string().as_bytes(), false);
}

#[no_mangle]
pub extern "C" fn __dachs_println_int__(i: c_int) {
    emit(i.to_string().as_bytes(), true);
}

#[no_mangle]
pub extern "C" fn __dachs_print_uint__(u: c_uint) {
    emit(u.to_string().as_bytes(), false);
}

#[no_mangle]
pub extern "C" fn __dachs_println_uint__(u: c_uint) {
    emit(u.to_string().as_bytes(), true);
}

#[no_mangle]
pub extern "C" fn __dachs_print_char__(c: c_char) {
    emit(&[c as u8], false);
}

#[no_mangle]
pub extern "C" fn __dachs_println_char__(c: c_char) {
    emit(&[c as u8], true);
}

/// # Safety
///
/// `s` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn __dachs_print_string__(s: *const c_char) {
    emit(c_string(s), false);
}

/// # Safety
///
/// `s` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn __dachs_println_string__(s: *const c_char) {
    emit(c_string(s), true);
}

/// # Safety
///
/// `s` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn __dachs_print_symbol__(s: *const c_char) {
    emit(c_string(s), false);
}

/// # Safety
///
/// `s` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn __dachs_println_symbol__(s: *const c_char) {
    emit(c_string(s), true);
}

#[no_mangle]
pub extern "C" fn __dachs_print_bool__(b: bool) {
    emit(format_bool(b).as_bytes(), false);
}

#[no_mangle]
pub extern "C" fn __dachs_println_bool__(b: bool) {
    emit(format_bool(b).as_bytes(), true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_float_fixed_form() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(3.14159265), "3.14159");
        assert_eq!(format_float(123456.0), "123456");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.0), "0");
    }

    #[test]
    fn test_float_scientific_form() {
        assert_eq!(format_float(1234567.0), "1.23457e+06");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-2.5e100), "-2.5e+100");
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn test_bool_rendering() {
        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }

    #[test]
    fn test_c_string_bytes() {
        let s = CString::new("dachs").unwrap();
        assert_eq!(unsafe { c_string(s.as_ptr()) }, b"dachs");
        assert_eq!(unsafe { c_string(std::ptr::null()) }, b"");
    }
}
