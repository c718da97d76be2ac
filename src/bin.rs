#![no_main]
#![no_std]

use kinkon as _;
use kinkon::{
    config::{DISPLAY_I2C_ADDR, UART_BAUD},
    device::Kinkon,
    oled::Ssd1306,
    player::DfPlayer,
    switches::PinBank,
};

use defmt::{error, info, trace};
use stm32l4xx_hal::{
    delay::Delay,
    gpio::{Alternate, Input, OpenDrain, PullUp, PB0, PB1, PB4, PB5, PB6, PB7},
    i2c::{self, I2c},
    pac::{I2C1, LPUART1},
    prelude::*,
    serial::{self, Config, Serial},
};

type GpsRx = serial::Rx<LPUART1>;
type PlayerTx = serial::Tx<LPUART1>;

type Oled = Ssd1306<
    I2c<
        I2C1,
        (
            PB6<Alternate<OpenDrain, 4>>,
            PB7<Alternate<OpenDrain, 4>>,
        ),
    >,
>;

// Threshold selectors on PB0, PB1, PB4; unit switch on PB5
type Switches = PinBank<
    PB0<Input<PullUp>>,
    PB1<Input<PullUp>>,
    PB4<Input<PullUp>>,
    PB5<Input<PullUp>>,
>;

type Chime = Kinkon<GpsRx, PlayerTx, Delay, Oled, Switches>;

#[rtic::app(device = stm32l4xx_hal::pac)]
mod app {
    use super::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        kinkon: Chime,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        trace!("init enter");

        let mut flash = cx.device.FLASH.constrain();
        let mut rcc = cx.device.RCC.constrain();
        let mut pwr = cx.device.PWR.constrain(&mut rcc.apb1r1);
        let clocks = rcc.cfgr.freeze(&mut flash.acr, &mut pwr);

        let mut gpioa = cx.device.GPIOA.split(&mut rcc.ahb2);
        let mut gpiob = cx.device.GPIOB.split(&mut rcc.ahb2);

        // GPS receiver on RX, audio module on TX, both at 9600 baud
        let tx = gpioa
            .pa2
            .into_alternate(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrl);
        let rx = gpioa
            .pa3
            .into_alternate(&mut gpioa.moder, &mut gpioa.otyper, &mut gpioa.afrl);
        let uart = Serial::lpuart1(
            cx.device.LPUART1,
            (tx, rx),
            Config::default().baudrate(UART_BAUD.bps()),
            clocks,
            &mut rcc.apb1r2,
        );
        let (player_tx, gps_rx) = uart.split();

        // OLED on I2C1
        let scl = gpiob.pb6.into_alternate_open_drain(
            &mut gpiob.moder,
            &mut gpiob.otyper,
            &mut gpiob.afrl,
        );
        let sda = gpiob.pb7.into_alternate_open_drain(
            &mut gpiob.moder,
            &mut gpiob.otyper,
            &mut gpiob.afrl,
        );
        let i2c = I2c::i2c1(
            cx.device.I2C1,
            (scl, sda),
            i2c::Config::new(400.khz(), clocks),
            &mut rcc.apb1r1,
        );
        let mut oled = Ssd1306::new(i2c, DISPLAY_I2C_ADDR);
        if let Err(e) = oled.init() {
            error!("display init failed: {}", e);
        }

        let switches = PinBank {
            pin_35: gpiob
                .pb0
                .into_pull_up_input(&mut gpiob.moder, &mut gpiob.pupdr),
            pin_85: gpiob
                .pb1
                .into_pull_up_input(&mut gpiob.moder, &mut gpiob.pupdr),
            pin_105: gpiob
                .pb4
                .into_pull_up_input(&mut gpiob.moder, &mut gpiob.pupdr),
            pin_mile: gpiob
                .pb5
                .into_pull_up_input(&mut gpiob.moder, &mut gpiob.pupdr),
        };

        let delay = Delay::new(cx.core.SYST, clocks);
        let mut kinkon = Kinkon::new(gps_rx, DfPlayer::new(player_tx, delay), oled, switches);
        if let Err(e) = kinkon.start() {
            error!("startup failed: {}", e);
        }

        info!("{} {} ready", kinkon::config::NAME, kinkon::config::VERSION);

        (Shared {}, Local { kinkon })
    }

    #[idle(local = [kinkon])]
    fn idle(cx: idle::Context) -> ! {
        loop {
            if let Err(e) = cx.local.kinkon.poll() {
                error!("poll failed: {}", e);
            }
        }
    }
}
