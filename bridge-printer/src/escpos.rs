//! ESC/POS command bytes
//!
//! The small command subset the bridge needs: cut, alignment, bold and
//! character size. Callers append these sequences to the adapter's
//! pending buffer.

/// Full cut (GS V 0)
pub const CUT: [u8; 3] = [0x1D, 0x56, 0x00];

/// Legacy cut (ESC i)
///
/// The OS-managed path emits this form: spooler drivers for receipt
/// printers accept it inside RAW documents where GS V is sometimes
/// swallowed.
pub const CUT_ESC_I: [u8; 2] = [0x1B, 0x69];

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Character size selection (GS ! n)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// Alignment command (ESC a n)
pub fn align(a: Align) -> [u8; 3] {
    let n = match a {
        Align::Left => 0x00,
        Align::Center => 0x01,
        Align::Right => 0x02,
    };
    [0x1B, 0x61, n]
}

/// Bold on/off (ESC E n)
pub fn bold(on: bool) -> [u8; 3] {
    [0x1B, 0x45, if on { 0x01 } else { 0x00 }]
}

/// Character size (GS ! n)
pub fn size(s: TextSize) -> [u8; 3] {
    let n = match s {
        TextSize::Normal => 0x00,
        TextSize::DoubleHeight => 0x01,
        TextSize::DoubleWidth => 0x10,
        TextSize::Double => 0x11,
    };
    [0x1D, 0x21, n]
}
