//! Message building for errors and warnings.
//!
//! A message grows by appending [`Operand`]s in order. Each operand kind
//! has its own formatting rule; see the variant docs.

use super::kind::{ErrorKind, WarningKind};
use crate::host::{HostEnv, HostObject};
use crate::types::{LType, SType};
use std::borrow::Cow;
use std::fmt::{self, Write as _};

/// Marker operand: appends the OS error state current at append time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Errno;

impl Errno {
    /// The calling thread's current OS error number.
    pub fn last() -> i32 {
        std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
    }

    /// OS description of error number `code`.
    pub fn describe(code: i32) -> String {
        strerror(code)
    }
}

#[cfg(unix)]
fn strerror(code: i32) -> String {
    use std::ffi::CStr;

    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: `buf` is writable for `buf.len()` bytes; the XSI strerror_r
    // nul-terminates its output on success.
    let rc = unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return format!("Unknown error {}", code);
    }
    // SAFETY: checked success above, so `buf` holds a nul-terminated string.
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    text.to_string_lossy().into_owned()
}

#[cfg(not(unix))]
fn strerror(code: i32) -> String {
    let text = std::io::Error::from_raw_os_error(code).to_string();
    let suffix = format!(" (os error {})", code);
    match text.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// One piece of a message.
pub enum Operand<'a> {
    /// Appended verbatim.
    Text(Cow<'a, str>),
    Signed(i128),
    Unsigned(u128),
    Float32(f32),
    Float64(f64),
    /// Appended as lowercase hex, `0x…`.
    Pointer(*const ()),
    /// `[errno <n>] <description>`, read when appended.
    Errno,
    /// Escaped: see [`escape_char`].
    Char(char),
    /// Canonical name of a domain enumeration.
    Name(&'static str),
    /// `repr` of a host value, or `<unknown>` if the host cannot produce it.
    HostRepr {
        host: &'a dyn HostEnv,
        value: &'a HostObject,
    },
    /// Text of a native host string, or `<unknown>`.
    HostStr {
        host: &'a dyn HostEnv,
        value: &'a HostObject,
    },
}

impl Operand<'_> {
    fn write_to(self, out: &mut String) {
        match self {
            Operand::Text(text) => out.push_str(&text),
            Operand::Signed(v) => {
                let _ = write!(out, "{}", v);
            }
            Operand::Unsigned(v) => {
                let _ = write!(out, "{}", v);
            }
            Operand::Float32(v) => {
                let _ = write!(out, "{}", v);
            }
            Operand::Float64(v) => {
                let _ = write!(out, "{}", v);
            }
            Operand::Pointer(p) => {
                let _ = write!(out, "{:p}", p);
            }
            Operand::Errno => {
                let code = Errno::last();
                let _ = write!(out, "[errno {}] {}", code, Errno::describe(code));
            }
            Operand::Char(c) => push_escaped_char(out, c),
            Operand::Name(name) => out.push_str(name),
            Operand::HostRepr { host, value } => push_host_text(out, host, host.repr(value)),
            Operand::HostStr { host, value } => push_host_text(out, host, host.to_str(value)),
        }
    }
}

fn push_host_text(out: &mut String, host: &dyn HostEnv, text: Option<String>) {
    match text {
        Some(text) => out.push_str(&text),
        None => {
            out.push_str("<unknown>");
            // drop the conversion failure so it cannot mask the real error
            host.take_error();
        }
    }
}

impl fmt::Debug for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Operand::Signed(v) => f.debug_tuple("Signed").field(v).finish(),
            Operand::Unsigned(v) => f.debug_tuple("Unsigned").field(v).finish(),
            Operand::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            Operand::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            Operand::Pointer(p) => f.debug_tuple("Pointer").field(p).finish(),
            Operand::Errno => f.write_str("Errno"),
            Operand::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Operand::Name(n) => f.debug_tuple("Name").field(n).finish(),
            Operand::HostRepr { value, .. } => f.debug_tuple("HostRepr").field(value).finish(),
            Operand::HostStr { value, .. } => f.debug_tuple("HostStr").field(value).finish(),
        }
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(v: &'a str) -> Self {
        Operand::Text(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(v: &'a String) -> Self {
        Operand::Text(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Operand<'_> {
    fn from(v: String) -> Self {
        Operand::Text(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Operand<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Operand::Text(v)
    }
}

macro_rules! impl_integer_operand {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(v: $t) -> Self {
                    Operand::$variant(v as $wide)
                }
            }
        )*
    };
}

impl_integer_operand!(Signed, i128: i8, i16, i32, i64, i128, isize);
impl_integer_operand!(Unsigned, u128: u8, u16, u32, u64, u128, usize);

impl From<f32> for Operand<'_> {
    fn from(v: f32) -> Self {
        Operand::Float32(v)
    }
}

impl From<f64> for Operand<'_> {
    fn from(v: f64) -> Self {
        Operand::Float64(v)
    }
}

impl<T> From<*const T> for Operand<'_> {
    fn from(p: *const T) -> Self {
        Operand::Pointer(p as *const ())
    }
}

impl<T> From<*mut T> for Operand<'_> {
    fn from(p: *mut T) -> Self {
        Operand::Pointer(p as *const ())
    }
}

impl From<char> for Operand<'_> {
    fn from(c: char) -> Self {
        Operand::Char(c)
    }
}

impl From<Errno> for Operand<'_> {
    fn from(_: Errno) -> Self {
        Operand::Errno
    }
}

impl From<SType> for Operand<'_> {
    fn from(v: SType) -> Self {
        Operand::Name(v.name())
    }
}

impl From<LType> for Operand<'_> {
    fn from(v: LType) -> Self {
        Operand::Name(v.name())
    }
}

impl From<ErrorKind> for Operand<'_> {
    fn from(v: ErrorKind) -> Self {
        Operand::Name(v.registry_name())
    }
}

impl From<WarningKind> for Operand<'_> {
    fn from(v: WarningKind) -> Self {
        Operand::Name(v.registry_name())
    }
}

/// Append-only message buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    buf: String,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<'a>(&mut self, op: impl Into<Operand<'a>>) {
        op.into().write_to(&mut self.buf);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self {
            buf: text.to_string(),
        }
    }
}

impl fmt::Write for Message {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

/// Push `c` onto `out`, escaping it if it is not printable ASCII or is a
/// backtick or backslash.
pub(crate) fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\\' => out.push_str("\\\\"),
        '`' => out.push_str("\\`"),
        ' '..='~' => out.push(c),
        _ => {
            let mut utf8 = [0u8; 4];
            for byte in c.encode_utf8(&mut utf8).bytes() {
                let _ = write!(out, "\\x{:02x}", byte);
            }
        }
    }
}

/// Escaped form of a single character.
///
/// Printable ASCII other than `` ` `` and `\` is returned as is; `\n`,
/// `\r`, `\t`, `\` and `` ` `` get a backslash escape; every other byte
/// becomes `\xHH` with lowercase hex digits.
pub fn escape_char(c: char) -> String {
    let mut out = String::with_capacity(4);
    push_escaped_char(&mut out, c);
    out
}

/// Prefix every backtick and backslash in `text` with a backslash.
///
/// Borrows `text` unchanged when there is nothing to escape.
pub fn escape_backticks(text: &str) -> Cow<'_, str> {
    let count = text.bytes().filter(|&b| b == b'`' || b == b'\\').count();
    if count == 0 {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + count);
    for c in text.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}
