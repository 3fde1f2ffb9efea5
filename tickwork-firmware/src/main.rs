//! Tickwork - LED sequence firmware
//!
//! Each press of the button advances the LED sequence by one step: the
//! LEDs light one by one, then go dark one by one, then it starts over.
//! Pins and clocking come from board.toml.

#![no_std]
#![no_main]

use panic_halt as _;

use tickwork_core::{DelayTimer, Dio, LedSequence};
use tickwork_drivers::{Button, Led};
use tickwork_hal_atmega32::{Atmega32Prescaler, Mmio, PORTS, TIMER0};

mod board;

/// Delay between button polls
const POLL_INTERVAL_MS: f32 = 5.0;

#[avr_device::entry]
fn main() -> ! {
    let mut regs = Mmio::take().unwrap();

    let dio = Dio::new(PORTS);
    let timer = DelayTimer::new(board::TIMER, TIMER0, Atmega32Prescaler);
    timer.set_normal_mode(&mut regs);
    timer.stop(&mut regs);

    let leds = board::LEDS.map(|config| Led::new(dio, config));
    for led in &leds {
        led.init(&mut regs).unwrap();
    }

    let mut button = Button::new(dio, board::BUTTON);
    button.init(&mut regs).unwrap();

    let mut sequence = LedSequence::new(leds.len()).unwrap();

    loop {
        if button.poll_press(&mut regs, &timer).unwrap() {
            let step = sequence.advance();
            leds[step.led].set(&mut regs, step.on).unwrap();
        }
        timer.delay_ms(&mut regs, POLL_INTERVAL_MS);
    }
}
