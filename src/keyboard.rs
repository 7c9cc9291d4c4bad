//! Key-code translation.
//!
//! This module turns the raw events delivered by the global key hook into
//! platform-independent [`KeyEvent`]s. Key names follow the X11 keysym
//! convention (`Return`, `space`, `BackSpace`, `Control_L`, ...) and the
//! translation ignores modifier state: `KeyA` is always `a`, `Num1` is always `1`.
//! Vendor keys the hook only knows by raw code are resolved to their `XF86*`
//! keysym through a per-platform table.

use std::fmt;

use rdev::{Event, EventType, Key};

/// First code of the platform "extended" key space.
///
/// Raw codes at or above this value fall outside the standard printable and
/// control key range.
pub const EXTENDED_KEY_START: u32 = 0x1_0000;

/// Logical identity of a key, decoupled from the raw platform code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIdentity {
    Return,
    Space,
    Delete,
    BackSpace,
    Tab,
    Escape,
    CapsLock,
    Up,
    Down,
    Left,
    Right,
    ControlL,
    ControlR,
    ShiftL,
    ShiftR,
    AltL,
    AltR,
    SuperL,
    SuperR,
    /// Function keys `F1`..`F12`.
    Function(u8),
    PageUp,
    PageDown,
    Home,
    End,
    /// A printable key, named by its unshifted character.
    Char(char),
    /// Any other named key (`Insert`, `KP_Enter`, `Num_Lock`...).
    Named(&'static str),
    /// A vendor key (media, browser, brightness...) resolved to its X11 keysym.
    Keysym { keysym: u32, name: &'static str },
    /// A raw platform code with no known name.
    Unknown(u32),
}

impl KeyIdentity {
    /// Returns true for keys in the platform extended key space.
    pub fn is_extended(&self) -> bool {
        match self {
            KeyIdentity::Keysym { keysym: code, .. } | KeyIdentity::Unknown(code) => {
                *code >= EXTENDED_KEY_START
            }
            _ => false,
        }
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyIdentity::Return => "Return",
            KeyIdentity::Space => "space",
            KeyIdentity::Delete => "Delete",
            KeyIdentity::BackSpace => "BackSpace",
            KeyIdentity::Tab => "Tab",
            KeyIdentity::Escape => "Escape",
            KeyIdentity::CapsLock => "Caps_Lock",
            KeyIdentity::Up => "Up",
            KeyIdentity::Down => "Down",
            KeyIdentity::Left => "Left",
            KeyIdentity::Right => "Right",
            KeyIdentity::ControlL => "Control_L",
            KeyIdentity::ControlR => "Control_R",
            KeyIdentity::ShiftL => "Shift_L",
            KeyIdentity::ShiftR => "Shift_R",
            KeyIdentity::AltL => "Alt_L",
            KeyIdentity::AltR => "Alt_R",
            KeyIdentity::SuperL => "Super_L",
            KeyIdentity::SuperR => "Super_R",
            KeyIdentity::Function(n) => return write!(f, "F{n}"),
            KeyIdentity::PageUp => "Page_Up",
            KeyIdentity::PageDown => "Page_Down",
            KeyIdentity::Home => "Home",
            KeyIdentity::End => "End",
            KeyIdentity::Char(c) => return write!(f, "{c}"),
            KeyIdentity::Named(name) | KeyIdentity::Keysym { name, .. } => *name,
            KeyIdentity::Unknown(code) => return write!(f, "{code:#x}"),
        };
        f.write_str(name)
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Press,
    Release,
}

/// A single key transition, as consumed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub identity: KeyIdentity,
    pub transition: Transition,
}

impl KeyEvent {
    pub fn press(identity: KeyIdentity) -> Self {
        Self {
            identity,
            transition: Transition::Press,
        }
    }

    pub fn release(identity: KeyIdentity) -> Self {
        Self {
            identity,
            transition: Transition::Release,
        }
    }
}

/// Translates a hook event into a [`KeyEvent`].
///
/// Mouse and wheel events are not key transitions and yield `None`.
pub fn translate(event: &Event) -> Option<KeyEvent> {
    match event.event_type {
        EventType::KeyPress(key) => Some(KeyEvent::press(identify(key))),
        EventType::KeyRelease(key) => Some(KeyEvent::release(identify(key))),
        _ => None,
    }
}

/// Maps an rdev key to its logical identity. Total: every key maps to something.
pub fn identify(key: Key) -> KeyIdentity {
    use KeyIdentity as K;
    match key {
        Key::Return => K::Return,
        Key::Space => K::Space,
        Key::Delete => K::Delete,
        Key::Backspace => K::BackSpace,
        Key::Tab => K::Tab,
        Key::Escape => K::Escape,
        Key::CapsLock => K::CapsLock,

        Key::UpArrow => K::Up,
        Key::DownArrow => K::Down,
        Key::LeftArrow => K::Left,
        Key::RightArrow => K::Right,

        Key::ControlLeft => K::ControlL,
        Key::ControlRight => K::ControlR,
        Key::ShiftLeft => K::ShiftL,
        Key::ShiftRight => K::ShiftR,
        Key::Alt => K::AltL,
        // rdev reports the right Alt key as AltGr.
        Key::AltGr => K::AltR,
        Key::MetaLeft => K::SuperL,
        Key::MetaRight => K::SuperR,

        Key::F1 => K::Function(1),
        Key::F2 => K::Function(2),
        Key::F3 => K::Function(3),
        Key::F4 => K::Function(4),
        Key::F5 => K::Function(5),
        Key::F6 => K::Function(6),
        Key::F7 => K::Function(7),
        Key::F8 => K::Function(8),
        Key::F9 => K::Function(9),
        Key::F10 => K::Function(10),
        Key::F11 => K::Function(11),
        Key::F12 => K::Function(12),

        Key::PageUp => K::PageUp,
        Key::PageDown => K::PageDown,
        Key::Home => K::Home,
        Key::End => K::End,

        Key::KeyA => K::Char('a'),
        Key::KeyB => K::Char('b'),
        Key::KeyC => K::Char('c'),
        Key::KeyD => K::Char('d'),
        Key::KeyE => K::Char('e'),
        Key::KeyF => K::Char('f'),
        Key::KeyG => K::Char('g'),
        Key::KeyH => K::Char('h'),
        Key::KeyI => K::Char('i'),
        Key::KeyJ => K::Char('j'),
        Key::KeyK => K::Char('k'),
        Key::KeyL => K::Char('l'),
        Key::KeyM => K::Char('m'),
        Key::KeyN => K::Char('n'),
        Key::KeyO => K::Char('o'),
        Key::KeyP => K::Char('p'),
        Key::KeyQ => K::Char('q'),
        Key::KeyR => K::Char('r'),
        Key::KeyS => K::Char('s'),
        Key::KeyT => K::Char('t'),
        Key::KeyU => K::Char('u'),
        Key::KeyV => K::Char('v'),
        Key::KeyW => K::Char('w'),
        Key::KeyX => K::Char('x'),
        Key::KeyY => K::Char('y'),
        Key::KeyZ => K::Char('z'),

        Key::Num0 => K::Char('0'),
        Key::Num1 => K::Char('1'),
        Key::Num2 => K::Char('2'),
        Key::Num3 => K::Char('3'),
        Key::Num4 => K::Char('4'),
        Key::Num5 => K::Char('5'),
        Key::Num6 => K::Char('6'),
        Key::Num7 => K::Char('7'),
        Key::Num8 => K::Char('8'),
        Key::Num9 => K::Char('9'),

        Key::BackQuote => K::Char('`'),
        Key::Minus => K::Char('-'),
        Key::Equal => K::Char('='),
        Key::LeftBracket => K::Char('['),
        Key::RightBracket => K::Char(']'),
        Key::BackSlash => K::Char('\\'),
        Key::IntlBackslash => K::Char('<'),
        Key::SemiColon => K::Char(';'),
        Key::Quote => K::Char('\''),
        Key::Comma => K::Char(','),
        Key::Dot => K::Char('.'),
        Key::Slash => K::Char('/'),

        Key::Insert => K::Named("Insert"),
        Key::PrintScreen => K::Named("Print"),
        Key::ScrollLock => K::Named("Scroll_Lock"),
        Key::Pause => K::Named("Pause"),
        Key::NumLock => K::Named("Num_Lock"),
        Key::Function => K::Named("Fn"),

        Key::KpReturn => K::Named("KP_Enter"),
        Key::KpMinus => K::Named("KP_Subtract"),
        Key::KpPlus => K::Named("KP_Add"),
        Key::KpMultiply => K::Named("KP_Multiply"),
        Key::KpDivide => K::Named("KP_Divide"),
        Key::KpDelete => K::Named("KP_Delete"),
        Key::Kp0 => K::Named("KP_0"),
        Key::Kp1 => K::Named("KP_1"),
        Key::Kp2 => K::Named("KP_2"),
        Key::Kp3 => K::Named("KP_3"),
        Key::Kp4 => K::Named("KP_4"),
        Key::Kp5 => K::Named("KP_5"),
        Key::Kp6 => K::Named("KP_6"),
        Key::Kp7 => K::Named("KP_7"),
        Key::Kp8 => K::Named("KP_8"),
        Key::Kp9 => K::Named("KP_9"),

        Key::Unknown(code) => match vendor_keysym(code) {
            Some(&(_, keysym, name)) => K::Keysym { keysym, name },
            None => K::Unknown(code),
        },
        #[allow(unreachable_patterns)]
        _ => K::Named("Unmapped"),
    }
}

/// Raw platform code, X11 keysym and keysym name of the vendor keys the hook
/// reports without a name.
///
/// On X11 the raw code is the server keycode (evdev code + 8).
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const VENDOR_KEYS: &[(u32, u32, &str)] = &[
    (121, 0x1008_ff12, "XF86AudioMute"),
    (122, 0x1008_ff11, "XF86AudioLowerVolume"),
    (123, 0x1008_ff13, "XF86AudioRaiseVolume"),
    (124, 0x1008_ff2a, "XF86PowerOff"),
    (148, 0x1008_ff1d, "XF86Calculator"),
    (150, 0x1008_ff2f, "XF86Sleep"),
    (151, 0x1008_ff2b, "XF86WakeUp"),
    (152, 0x1008_ff5d, "XF86Explorer"),
    (158, 0x1008_ff2e, "XF86WWW"),
    (160, 0x1008_ff2d, "XF86ScreenSaver"),
    (163, 0x1008_ff19, "XF86Mail"),
    (164, 0x1008_ff30, "XF86Favorites"),
    (165, 0x1008_ff33, "XF86MyComputer"),
    (166, 0x1008_ff26, "XF86Back"),
    (167, 0x1008_ff27, "XF86Forward"),
    (169, 0x1008_ff2c, "XF86Eject"),
    (171, 0x1008_ff17, "XF86AudioNext"),
    (172, 0x1008_ff14, "XF86AudioPlay"),
    (173, 0x1008_ff16, "XF86AudioPrev"),
    (174, 0x1008_ff15, "XF86AudioStop"),
    (175, 0x1008_ff1c, "XF86AudioRecord"),
    (179, 0x1008_ff81, "XF86Tools"),
    (180, 0x1008_ff18, "XF86HomePage"),
    (181, 0x1008_ff73, "XF86Reload"),
    (225, 0x1008_ff1b, "XF86Search"),
    (232, 0x1008_ff03, "XF86MonBrightnessDown"),
    (233, 0x1008_ff02, "XF86MonBrightnessUp"),
    (235, 0x1008_ff59, "XF86Display"),
    (237, 0x1008_ff06, "XF86KbdBrightnessDown"),
    (238, 0x1008_ff05, "XF86KbdBrightnessUp"),
];

/// Windows reports virtual-key codes instead.
#[cfg(target_os = "windows")]
const VENDOR_KEYS: &[(u32, u32, &str)] = &[
    (0xa6, 0x1008_ff26, "XF86Back"),
    (0xa7, 0x1008_ff27, "XF86Forward"),
    (0xa8, 0x1008_ff73, "XF86Reload"),
    (0xa9, 0x1008_ff28, "XF86Stop"),
    (0xaa, 0x1008_ff1b, "XF86Search"),
    (0xab, 0x1008_ff30, "XF86Favorites"),
    (0xac, 0x1008_ff18, "XF86HomePage"),
    (0xad, 0x1008_ff12, "XF86AudioMute"),
    (0xae, 0x1008_ff11, "XF86AudioLowerVolume"),
    (0xaf, 0x1008_ff13, "XF86AudioRaiseVolume"),
    (0xb0, 0x1008_ff17, "XF86AudioNext"),
    (0xb1, 0x1008_ff16, "XF86AudioPrev"),
    (0xb2, 0x1008_ff15, "XF86AudioStop"),
    (0xb3, 0x1008_ff14, "XF86AudioPlay"),
    (0xb4, 0x1008_ff19, "XF86Mail"),
    (0xb6, 0x1008_ff33, "XF86MyComputer"),
    (0xb7, 0x1008_ff1d, "XF86Calculator"),
];

/// Media keys arrive as system-defined events on macOS, not as key codes.
#[cfg(target_os = "macos")]
const VENDOR_KEYS: &[(u32, u32, &str)] = &[];

fn vendor_keysym(code: u32) -> Option<&'static (u32, u32, &'static str)> {
    VENDOR_KEYS.iter().find(|(raw, ..)| *raw == code)
}
