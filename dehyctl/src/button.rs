use crate::hal::{InPin, Inputs, Level};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ButtonEvent {
    None,
    Pressed,
    Released,
}

/// Edge detection of an active-low push button.
pub struct Button {
    pin: InPin,
    pressed: bool,
}

impl Button {
    pub const fn new(pin: InPin) -> Self {
        Self {
            pin,
            pressed: false,
        }
    }

    /// Sample the button once.
    pub fn update(&mut self, inputs: &mut impl Inputs) -> ButtonEvent {
        let pressed = inputs.read(self.pin) == Level::Low;

        let ev = match (self.pressed, pressed) {
            (false, true) => ButtonEvent::Pressed,
            (true, false) => ButtonEvent::Released,
            _ => ButtonEvent::None,
        };
        self.pressed = pressed;
        ev
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::MockInputs;

    #[test]
    fn test_press_release() {
        let mut io = MockInputs::new();
        let mut b = Button::new(InPin::Mode);

        assert_eq!(b.update(&mut io), ButtonEvent::None);
        io.mode = true;
        assert_eq!(b.update(&mut io), ButtonEvent::Pressed);
        assert_eq!(b.update(&mut io), ButtonEvent::None);
        assert_eq!(b.update(&mut io), ButtonEvent::None);
        io.mode = false;
        assert_eq!(b.update(&mut io), ButtonEvent::Released);
        assert_eq!(b.update(&mut io), ButtonEvent::None);
    }

    #[test]
    fn test_pins_are_independent() {
        let mut io = MockInputs::new();
        let mut mode = Button::new(InPin::Mode);
        let mut select = Button::new(InPin::Select);

        io.select = true;
        assert_eq!(mode.update(&mut io), ButtonEvent::None);
        assert_eq!(select.update(&mut io), ButtonEvent::Pressed);
    }
}

// vim: ts=4 sw=4 expandtab
