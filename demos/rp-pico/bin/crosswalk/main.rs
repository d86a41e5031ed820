#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::delay::Delay;
use critical_section::Mutex;
use panic_halt as _;
use rp_pico::entry;
use rp_pico::hal::{
    Clock, Sio, Timer,
    clocks::init_clocks_and_plls,
    gpio::{self, Interrupt},
    pac::{self, interrupt},
    watchdog::Watchdog,
};
use rtt_target::{rprintln, rtt_init_print};

use rp_pico_demos::outputs::{PinLights, PwmTone};
use rp_pico_demos::time::CounterClock;

use crosswalk_signal::{
    Buzzer, PedestrianLatch, SignalController, TONE_FREQUENCY_HZ, TickScheduler, TimeSource,
    status_line,
};

/// Pedestrian push-button on GPIO5, pulled up, pressed = low
type ButtonPin = gpio::Pin<gpio::bank0::Gpio5, gpio::FunctionSioInput, gpio::PullUp>;

/// PWM counter clock after dividing the 125 MHz system clock by 125
const PWM_COUNTER_HZ: u32 = 1_000_000;

/// Wrap value giving a TONE_FREQUENCY_HZ buzzer tone
const PWM_TOP: u16 = (PWM_COUNTER_HZ / TONE_FREQUENCY_HZ - 1) as u16;

static PEDESTRIAN_REQUEST: PedestrianLatch = PedestrianLatch::new();

/// Handed to the interrupt so it can acknowledge the edge
static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));

#[interrupt]
fn IO_IRQ_BANK0() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON.borrow_ref_mut(cs).as_mut() {
            if button.interrupt_status(Interrupt::EdgeLow) {
                button.clear_interrupt(Interrupt::EdgeLow);
                PEDESTRIAN_REQUEST.raise();
            }
        }
    });
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("Iniciando controle de semáforo...");

    // Get peripherals
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();

    // Set up watchdog driver
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure clocks (125 MHz)
    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // Set up the Single Cycle IO (for GPIO access)
    let sio = Sio::new(pac.SIO);

    // Set the pins to their default state
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Lamps: green on GPIO11, red on GPIO13, both active-high
    let green = pins.gpio11.into_push_pull_output();
    let red = pins.gpio13.into_push_pull_output();
    let lights = PinLights::new(red, green, false);

    // Buzzer on GPIO21 (PWM2 channel B)
    let mut pwm_slices = rp_pico::hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
    pwm_slices.pwm2.set_div_int(125u8); // 125 MHz / 125 = 1 MHz
    pwm_slices.pwm2.set_top(PWM_TOP);
    pwm_slices.pwm2.enable();
    let mut buzzer_channel = pwm_slices.pwm2.channel_b;
    buzzer_channel.output_to(pins.gpio21);
    rprintln!("Buzzer configured on GPIO21 at {} Hz", TONE_FREQUENCY_HZ);

    // Button: falling edge raises a crossing request
    let button = pins.gpio5.into_pull_up_input();
    button.set_interrupt_enabled(Interrupt::EdgeLow, true);
    critical_section::with(|cs| BUTTON.borrow(cs).replace(Some(button)));

    // Free-running microsecond counter
    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let time_source = CounterClock::new(timer);

    let buzzer = Buzzer::new(PwmTone::new(buzzer_channel), &time_source);
    let mut controller = SignalController::new(lights, &PEDESTRIAN_REQUEST, &buzzer);
    let mut scheduler = TickScheduler::new();

    // Safety: the handler only touches BUTTON and the latch, both initialized above
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0);
    }

    scheduler.start(time_source.now());
    controller.start();
    if let Ok(line) = status_line(controller.phase()) {
        rprintln!("{}", line.as_str());
    }

    // Set up delay
    let mut delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    loop {
        let report = scheduler.service(time_source.now(), &mut controller);

        if let Some(phase) = report.coarse.and_then(|outcome| outcome.entered()) {
            if let Ok(line) = status_line(phase) {
                rprintln!("{}", line.as_str());
            }
        }

        delay.delay_us(report.next_in.as_delay_us());
    }
}
