use core::convert::Infallible;
use core::ptr;

use atsamd21g::tc3::COUNT16;
use atsamd21g::{Interrupt, GCLK, NVMCTRL, PM, PORT, SERCOM3, SYSCTRL, TC3};
use cortex_m::interrupt;
use cortex_m::peripheral::NVIC;

use crate::clock::{arithmetic_baud, CPU_HZ};
use crate::report::Sink;
use crate::tick::{OverflowFlag, TICKS};
use crate::timer::{Prescaler, TimerConfig};

/* DFLL48M coarse calibration, bits 63:58 of the NVM software calibration area */
const NVM_SW_CALIB_DFLL: *const u32 = 0x0080_6024 as *const u32;
const DFLL_FINE_MIDPOINT: u16 = 512;


/// Switch GCLK0 (CPU, TC3, SERCOM3) from the 1 MHz reset clock to the DFLL
/// running open loop at 48 MHz.
pub fn init_48_mhz_clock(gclk: &GCLK, sysctrl: &SYSCTRL, nvmctrl: &mut NVMCTRL) {
    interrupt::free(|_| {
        /* One flash wait state is required above 24 MHz */
        nvmctrl.ctrlb.modify(|_, w| unsafe { w.rws().bits(1) });

        /* Errata: DFLL must leave on-demand mode before any other DFLL register is touched */
        sysctrl.dfllctrl.write(|w| w.ondemand().clear_bit());

        /* Wait until it is ready */
        while sysctrl.pclksr.read().dfllrdy().bit_is_clear() {}

        /* Load factory coarse calibration, 0x3F means the row was never programmed */
        let mut coarse = (unsafe { ptr::read_volatile(NVM_SW_CALIB_DFLL) } >> 26) & 0x3F;
        if coarse == 0x3F {
            coarse = 0x1F;
        }
        sysctrl.dfllval.write(|w| unsafe {
            w.coarse().bits(coarse as u8).fine().bits(DFLL_FINE_MIDPOINT)
        });

        /* Wait, again... */
        while sysctrl.pclksr.read().dfllrdy().bit_is_clear() {}

        /* Fire up DFLL in open-loop mode */
        sysctrl.dfllctrl.write(|w| w.ondemand().clear_bit().enable().set_bit());

        /* Wait, again... */
        while sysctrl.pclksr.read().dfllrdy().bit_is_clear() {}

        /* Set up clock generator 0 (== CPU clock) without divisor */
        gclk.gendiv.write(|w| unsafe { w.div().bits(0).id().bits(0) });

        /* Wait, again... */
        while gclk.status.read().syncbusy().bit_is_set() {}

        /* Set up clock generator 0 (== CPU clock) from DFLL source */
        gclk.genctrl.write(|w| unsafe {
            w.id()
                .bits(0)
                .genen()
                .set_bit()
                .src()
                .dfll48m()
                .idc()
                .set_bit()
        });

        /* Wait, again... */
        while gclk.status.read().syncbusy().bit_is_set() {}

        defmt::debug!("DFLL48M coarse calibration {=u32}", coarse);
    });

    defmt::info!("GCLK0 running from DFLL48M at {=u32} Hz", CPU_HZ);
}


/// Start TC3 overflowing once per tick and unmask its interrupt.
///
/// Takes the peripheral so it can only be set up once; from here on the
/// interrupt handler owns it (see [`on_tc3_overflow`]). `config` must be
/// derived from the GCLK0 frequency.
pub fn init_tick_timer(pm: &mut PM, gclk: &GCLK, tc3: TC3, config: &TimerConfig) {
    interrupt::free(|_| {
        let tc = tc3.count16();

        /* Enable clock for TC3 */
        pm.apbcmask.modify(|_, w| w.tc3_().set_bit());

        /* Setup CPU clock for TCC2 and TC3 */
        gclk.clkctrl.write(|w| w.clken().set_bit().gen().gclk0().id().tcc2_tc3());

        /* And wait */
        while gclk.status.read().syncbusy().bit_is_set() {}

        /* 16 bit counter, restarting from zero whenever it matches CC0 */
        tc.ctrla.modify(|_, w| {
            let w = w.mode().count16().wavegen().mfrq();
            match config.prescaler() {
                Prescaler::Div1 => w.prescaler().div1(),
                Prescaler::Div2 => w.prescaler().div2(),
                Prescaler::Div4 => w.prescaler().div4(),
                Prescaler::Div8 => w.prescaler().div8(),
                Prescaler::Div16 => w.prescaler().div16(),
                Prescaler::Div64 => w.prescaler().div64(),
                Prescaler::Div256 => w.prescaler().div256(),
                Prescaler::Div1024 => w.prescaler().div1024(),
            }
        });

        /* And wait */
        while tc.status.read().syncbusy().bit_is_set() {}

        /* Setup period */
        tc.cc[0].write(|w| unsafe { w.cc().bits(config.top()) });

        /* And wait */
        while tc.status.read().syncbusy().bit_is_set() {}

        /* Set interrupt to trigger on overflow, dropping anything stale */
        tc.intflag.write(|w| w.ovf().set_bit());
        tc.intenset.write(|w| w.ovf().set_bit());

        /* Clear any pending IRQ and enable it */
        NVIC::unpend(Interrupt::TC3);
        unsafe { NVIC::unmask(Interrupt::TC3) };

        /* Enable */
        tc.ctrla.modify(|_, w| w.enable().set_bit());

        /* And wait */
        while tc.status.read().syncbusy().bit_is_set() {}
    });

    defmt::info!(
        "TC3 ticking at {=u32} Hz, {=u32} counts per tick",
        config.tick_hz(),
        config.reload()
    );
}


impl OverflowFlag for COUNT16 {
    fn is_pending(&self) -> bool {
        self.intflag.read().ovf().bit_is_set()
    }

    fn acknowledge(&self) {
        /* INTFLAG is write-one-to-clear */
        self.intflag.write(|w| w.ovf().set_bit());
    }
}


/// Body of the TC3 interrupt handler.
pub fn on_tc3_overflow() {
    /* TC3 was consumed by init_tick_timer, nothing else touches its registers */
    let tc3 = unsafe { &*TC3::ptr() };
    TICKS.on_overflow(tc3.count16());
}


/// Blocking transmitter on SERCOM3, TX on PA22.
pub struct SerialPort {
    sercom: SERCOM3,
}

impl SerialPort {
    /// 8N1 at `baud`, clocked from GCLK0. Transmit only.
    pub fn new(pm: &mut PM, gclk: &GCLK, port: &PORT, sercom: SERCOM3, baud: u32) -> Self {
        interrupt::free(|_| {
            /* PA22 to peripheral function C (SERCOM3 PAD0) */
            port.pmux0_[11].modify(|_, w| unsafe { w.pmuxe().bits(2) });
            port.pincfg0_[22].modify(|_, w| w.pmuxen().set_bit());

            /* Enable clock for SERCOM3 */
            pm.apbcmask.modify(|_, w| w.sercom3_().set_bit());

            /* Set up clock generator 0 as core clock for SERCOM3 */
            gclk.clkctrl.write(|w| w.clken().set_bit().gen().gclk0().id().sercom3_core());

            /* And wait */
            while gclk.status.read().syncbusy().bit_is_set() {}

            let usart = sercom.usart();

            /* Reset the USART */
            usart.ctrla.write(|w| w.swrst().set_bit());

            /* More waiting... */
            while usart.syncbusy.read().swrst().bit_is_set() {}

            /* Internal clock, LSB first, TX on PAD0, RX on PAD1, 16x arithmetic sampling */
            usart.ctrla.write(|w| unsafe {
                w.mode()
                    .bits(1)
                    .dord()
                    .set_bit()
                    .txpo()
                    .bits(0)
                    .rxpo()
                    .bits(1)
                    .sampr()
                    .bits(0)
            });

            /* 8 data bits, 1 stop bit, transmitter on */
            usart.ctrlb.write(|w| unsafe {
                w.chsize().bits(0).sbmode().clear_bit().txen().set_bit()
            });

            /* More waiting... */
            while usart.syncbusy.read().ctrlb().bit_is_set() {}

            usart.baud().write(|w| unsafe { w.baud().bits(arithmetic_baud(CPU_HZ, baud)) });

            /* Enable */
            usart.ctrla.modify(|_, w| w.enable().set_bit());

            /* And yet more waiting... */
            while usart.syncbusy.read().enable().bit_is_set() {}
        });

        defmt::info!("SERCOM3 USART up at {=u32} baud", baud);

        SerialPort { sercom }
    }

    pub fn write_byte(&mut self, byte: u8) {
        let usart = self.sercom.usart();

        /* Wait for room in the data register */
        while usart.intflag.read().dre().bit_is_clear() {}

        usart.data.write(|w| unsafe { w.data().bits(u16::from(byte)) });
    }
}

impl Sink for SerialPort {
    type Error = Infallible;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        for &byte in bytes {
            self.write_byte(byte);
        }
        Ok(())
    }
}
