//! The closed input vocabulary and its keyboard bindings.

use std::fmt;

use sdl2::keyboard::Keycode;

/// Press/release events for the eight virtual buttons, plus `TurnOff` when
/// the window is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    LeftPressed,
    LeftReleased,
    RightPressed,
    RightReleased,
    UpPressed,
    UpReleased,
    DownPressed,
    DownReleased,
    SelectPressed,
    SelectReleased,
    StartPressed,
    StartReleased,
    Button1Pressed,
    Button1Released,
    Button2Pressed,
    Button2Released,
    TurnOff,
}

impl Event {
    pub const ALL: [Event; 17] = [
        Event::LeftPressed,
        Event::LeftReleased,
        Event::RightPressed,
        Event::RightReleased,
        Event::UpPressed,
        Event::UpReleased,
        Event::DownPressed,
        Event::DownReleased,
        Event::SelectPressed,
        Event::SelectReleased,
        Event::StartPressed,
        Event::StartReleased,
        Event::Button1Pressed,
        Event::Button1Released,
        Event::Button2Pressed,
        Event::Button2Released,
        Event::TurnOff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Event::LeftPressed => "left_pressed",
            Event::LeftReleased => "left_released",
            Event::RightPressed => "right_pressed",
            Event::RightReleased => "right_released",
            Event::UpPressed => "up_pressed",
            Event::UpReleased => "up_released",
            Event::DownPressed => "down_pressed",
            Event::DownReleased => "down_released",
            Event::SelectPressed => "select_pressed",
            Event::SelectReleased => "select_released",
            Event::StartPressed => "start_pressed",
            Event::StartReleased => "start_released",
            Event::Button1Pressed => "button1_pressed",
            Event::Button1Released => "button1_released",
            Event::Button2Pressed => "button2_pressed",
            Event::Button2Released => "button2_released",
            Event::TurnOff => "turn_off",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct KeyBinding {
    pub name: &'static str,
    pub key: Keycode,
    pub pressed: Event,
    pub released: Event,
}

pub static KEY_BINDINGS: [KeyBinding; 8] = [
    KeyBinding {
        name: "up",
        key: Keycode::W,
        pressed: Event::UpPressed,
        released: Event::UpReleased,
    },
    KeyBinding {
        name: "left",
        key: Keycode::A,
        pressed: Event::LeftPressed,
        released: Event::LeftReleased,
    },
    KeyBinding {
        name: "down",
        key: Keycode::S,
        pressed: Event::DownPressed,
        released: Event::DownReleased,
    },
    KeyBinding {
        name: "right",
        key: Keycode::D,
        pressed: Event::RightPressed,
        released: Event::RightReleased,
    },
    KeyBinding {
        name: "button1",
        key: Keycode::LCtrl,
        pressed: Event::Button1Pressed,
        released: Event::Button1Released,
    },
    KeyBinding {
        name: "button2",
        key: Keycode::Space,
        pressed: Event::Button2Pressed,
        released: Event::Button2Released,
    },
    KeyBinding {
        name: "select",
        key: Keycode::Escape,
        pressed: Event::SelectPressed,
        released: Event::SelectReleased,
    },
    KeyBinding {
        name: "start",
        key: Keycode::Return,
        pressed: Event::StartPressed,
        released: Event::StartReleased,
    },
];

pub fn binding_for(key: Keycode) -> Option<&'static KeyBinding> {
    KEY_BINDINGS.iter().find(|b| b.key == key)
}

/// The part of an SDL event the input layer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
    Other,
}

impl From<&sdl2::event::Event> for RawEvent {
    fn from(event: &sdl2::event::Event) -> Self {
        use sdl2::event::Event as Sdl;
        match event {
            Sdl::Quit { .. } => RawEvent::Quit,
            Sdl::KeyDown {
                keycode: Some(key), ..
            } => RawEvent::KeyDown(*key),
            Sdl::KeyUp {
                keycode: Some(key), ..
            } => RawEvent::KeyUp(*key),
            _ => RawEvent::Other,
        }
    }
}

pub fn translate(raw: RawEvent) -> Option<Event> {
    match raw {
        RawEvent::Quit => Some(Event::TurnOff),
        RawEvent::KeyDown(key) => binding_for(key).map(|b| b.pressed),
        RawEvent::KeyUp(key) => binding_for(key).map(|b| b.released),
        RawEvent::Other => None,
    }
}

/// Pulls from `poll` until an event maps to the vocabulary or the queue is
/// empty. Unmapped events are consumed and skipped.
pub fn next_event(mut poll: impl FnMut() -> Option<RawEvent>) -> Option<Event> {
    while let Some(raw) = poll() {
        if let Some(event) = translate(raw) {
            return Some(event);
        }
    }
    None
}
