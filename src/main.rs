#![no_std]
#![no_main]

use defmt_rtt as _;
use max7219::MAX7219;
use panic_probe as _;
use rtic::app;

mod pico;

use wokwi_clock::{ButtonPolicy, ClockConfig, ClockTime, Controller};

const CONFIG: ClockConfig = ClockConfig::DEFAULT
    .with_seed(ClockTime::new(12, 34, 56))
    .with_button_policy(ButtonPolicy::LevelCooldown);

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use crate::pico::{PicoMonotonic, SetButton, SevenSegment, SwitchBank, TickAlarm};
    use embedded_hal::digital::v2::ToggleableOutputPin;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::RateExtU32,
        gpio::{bank0::Gpio25, FunctionSio, FunctionSpi, Pin, PullDown, SioOutput},
        sio::Sio,
        spi::Spi,
        timer::Timer,
        watchdog::Watchdog,
    };

    // Type definition for the MAX7219 display
    type Spi0 = Spi<rp_pico::hal::spi::Enabled, rp_pico::hal::pac::SPI0, (
        Pin<rp_pico::hal::gpio::bank0::Gpio19, FunctionSpi, PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio16, FunctionSpi, PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio18, FunctionSpi, PullDown>
    )>;
    type CsPin = Pin<rp_pico::hal::gpio::bank0::Gpio17, FunctionSio<SioOutput>, PullDown>;
    type DisplayType = SevenSegment<max7219::connectors::SpiConnectorSW<Spi0, CsPin>>;

    // Shared between the tick handler and the idle reader. Only the tick
    // handler writes.
    #[shared]
    struct Shared {
        controller: Controller,
    }

    #[local]
    struct Local {
        display: DisplayType,
        led: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>,
        alarm: TickAlarm,
        button: SetButton,
        switches: SwitchBank,
        mono: PicoMonotonic,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = TickAlarm::new(timer.alarm_0().unwrap());

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let button = SetButton::new(pins.gpio15.into_pull_up_input());

        // Switch bank on GPIO0..=9, read through the SIO input register.
        // The pins keep their configuration when the handles drop.
        let _ = pins.gpio0.into_pull_down_input();
        let _ = pins.gpio1.into_pull_down_input();
        let _ = pins.gpio2.into_pull_down_input();
        let _ = pins.gpio3.into_pull_down_input();
        let _ = pins.gpio4.into_pull_down_input();
        let _ = pins.gpio5.into_pull_down_input();
        let _ = pins.gpio6.into_pull_down_input();
        let _ = pins.gpio7.into_pull_down_input();
        let _ = pins.gpio8.into_pull_down_input();
        let _ = pins.gpio9.into_pull_down_input();

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let mut driver = MAX7219::from_spi_cs(1, spi, cs).unwrap();
        driver.power_on().unwrap();
        driver.set_intensity(0, 0x4).unwrap();
        driver.clear_display(0).unwrap();
        let mut display = SevenSegment::new(driver);

        let mut controller = Controller::new(&CONFIG);
        controller.start(&mut alarm, &mut display);

        (
            Shared { controller },
            Local {
                display,
                led,
                alarm,
                button,
                switches: SwitchBank,
                mono: PicoMonotonic(timer),
            },
            init::Monotonics(),
        )
    }

    // Reads the time, never writes it.
    #[idle(shared = [controller])]
    fn idle(mut ctx: idle::Context) -> ! {
        let mut shown = ClockTime::MIDNIGHT;
        loop {
            let now = ctx.shared.controller.lock(|c| c.time());
            if now != shown {
                shown = now;
                defmt::info!("{=str}", now.text().as_str());
            }
            cortex_m::asm::wfi();
        }
    }

    // Hardware Task: Timer Interrupt (every 100 ms). Samples the button,
    // then counts the period.
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [controller], local = [alarm, button, switches, mono, display, led])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        let local = ctx.local;
        let changed = ctx.shared.controller.lock(|c| {
            c.poll(
                &mut *local.alarm,
                &mut *local.button,
                &*local.switches,
                &*local.mono,
                &mut *local.display,
            )
        });

        if changed {
            local.led.toggle().ok();
        }
    }
}
