/// MBC3 clock registers, as selected through 0x4000-0x5FFF.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RtcRegister {
    Seconds,
    Minutes,
    Hours,
    /// Low 8 bits of the day counter.
    DayLow,
    /// Day counter bit 8 (bit 0), halt (bit 6) and day carry (bit 7).
    DayHigh,
}

impl RtcRegister {
    pub fn from_select(value: u8) -> Option<Self> {
        match value {
            0x08 => Some(RtcRegister::Seconds),
            0x09 => Some(RtcRegister::Minutes),
            0x0A => Some(RtcRegister::Hours),
            0x0B => Some(RtcRegister::DayLow),
            0x0C => Some(RtcRegister::DayHigh),
            _ => None,
        }
    }
}

const DAY_HIGH_BIT8: u8 = 0x01;
const DAY_HIGH_HALT: u8 = 0x40;
const DAY_HIGH_CARRY: u8 = 0x80;
const MAX_DAY: u16 = 0x01FF;
/// Seconds for the day counter to run through all 512 values once.
const FULL_CYCLE: u64 = (MAX_DAY as u64 + 1) * 24 * 60 * 60;

/// Size of the clock record appended to the RAM payload.
pub(crate) const RTC_RECORD_LEN: usize = 10 * 4 + 8;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RtcRegisters {
    pub(crate) seconds: u8,
    pub(crate) minutes: u8,
    pub(crate) hours: u8,
    pub(crate) days: u16,
    pub(crate) halt: bool,
    pub(crate) carry: bool,
}

impl RtcRegisters {
    fn day_high(&self) -> u8 {
        let mut out = ((self.days >> 8) as u8) & DAY_HIGH_BIT8;
        if self.halt {
            out |= DAY_HIGH_HALT;
        }
        if self.carry {
            out |= DAY_HIGH_CARRY;
        }
        out
    }

    fn set_day_high(&mut self, value: u8) {
        self.days = (self.days & 0x00FF) | (((value & DAY_HIGH_BIT8) as u16) << 8);
        self.halt = value & DAY_HIGH_HALT != 0;
        self.carry = value & DAY_HIGH_CARRY != 0;
    }

    /// Unused register bits read back as 1 on hardware.
    fn read(&self, reg: RtcRegister) -> u8 {
        match reg {
            RtcRegister::Seconds => self.seconds | 0xC0,
            RtcRegister::Minutes => self.minutes | 0xC0,
            RtcRegister::Hours => self.hours | 0xE0,
            RtcRegister::DayLow => self.days as u8,
            RtcRegister::DayHigh => self.day_high() | 0x3E,
        }
    }

    fn write(&mut self, reg: RtcRegister, value: u8) {
        match reg {
            RtcRegister::Seconds => self.seconds = value & 0x3F,
            RtcRegister::Minutes => self.minutes = value & 0x3F,
            RtcRegister::Hours => self.hours = value & 0x1F,
            RtcRegister::DayLow => self.days = (self.days & 0x0100) | value as u16,
            RtcRegister::DayHigh => self.set_day_high(value),
        }
    }

    fn in_range(&self) -> bool {
        self.seconds < 60 && self.minutes < 60 && self.hours < 24
    }

    fn advance(&mut self, mut seconds: u64) {
        // Out-of-range values count up to their bit-width limit and wrap
        // to 0 without carrying, so step them one second at a time until
        // every counter is back in range.
        while seconds > 0 && !self.in_range() {
            self.tick_second();
            seconds -= 1;
        }
        if seconds == 0 {
            return;
        }
        if seconds >= FULL_CYCLE {
            self.carry = true;
            seconds %= FULL_CYCLE;
        }

        let total = self.seconds as u64 + seconds;
        self.seconds = (total % 60) as u8;
        let total = self.minutes as u64 + total / 60;
        self.minutes = (total % 60) as u8;
        let total = self.hours as u64 + total / 60;
        self.hours = (total % 24) as u8;
        let total = self.days as u64 + total / 24;
        if total > MAX_DAY as u64 {
            self.carry = true;
        }
        self.days = (total % (MAX_DAY as u64 + 1)) as u16;
    }

    fn tick_second(&mut self) {
        if self.seconds == 59 {
            self.seconds = 0;
            self.tick_minute();
        } else {
            self.seconds = (self.seconds + 1) & 0x3F;
        }
    }

    fn tick_minute(&mut self) {
        if self.minutes == 59 {
            self.minutes = 0;
            self.tick_hour();
        } else {
            self.minutes = (self.minutes + 1) & 0x3F;
        }
    }

    fn tick_hour(&mut self) {
        if self.hours == 23 {
            self.hours = 0;
            self.tick_day();
        } else {
            self.hours = (self.hours + 1) & 0x1F;
        }
    }

    fn tick_day(&mut self) {
        if self.days >= MAX_DAY {
            self.days = 0;
            self.carry = true;
        } else {
            self.days += 1;
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for value in [
            self.seconds,
            self.minutes,
            self.hours,
            self.days as u8,
            self.day_high(),
        ] {
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
    }

    fn decode(words: &[u8]) -> Self {
        let word = |i: usize| {
            let bytes = [
                words[i * 4],
                words[i * 4 + 1],
                words[i * 4 + 2],
                words[i * 4 + 3],
            ];
            u32::from_le_bytes(bytes) as u8
        };
        let mut regs = RtcRegisters::default();
        regs.write(RtcRegister::Seconds, word(0));
        regs.write(RtcRegister::Minutes, word(1));
        regs.write(RtcRegister::Hours, word(2));
        regs.write(RtcRegister::DayLow, word(3));
        regs.write(RtcRegister::DayHigh, word(4));
        regs
    }
}

/// MBC3 real-time clock.
///
/// `live` counts wall-clock seconds while not halted; `latched` is the copy
/// the CPU reads, refreshed only by the latch sequence. `reference` is the
/// wall-clock second `live` was last brought up to date at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Rtc {
    pub(crate) live: RtcRegisters,
    pub(crate) latched: RtcRegisters,
    pub(crate) reference: u64,
}

impl Rtc {
    pub(crate) fn new(now: u64) -> Self {
        Self {
            live: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            reference: now,
        }
    }

    /// Bring the live registers up to `now`.
    ///
    /// Time spent halted is dropped: the reference always moves to `now`.
    pub(crate) fn sync(&mut self, now: u64) {
        let elapsed = now.saturating_sub(self.reference);
        self.reference = now;
        if !self.live.halt && elapsed > 0 {
            self.live.advance(elapsed);
        }
    }

    pub(crate) fn latch(&mut self) {
        self.latched = self.live;
    }

    pub(crate) fn read(&self, reg: RtcRegister) -> u8 {
        self.latched.read(reg)
    }

    pub(crate) fn write(&mut self, reg: RtcRegister, value: u8) {
        self.live.write(reg, value);
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        self.live.encode(out);
        self.latched.encode(out);
        out.extend_from_slice(&self.reference.to_le_bytes());
    }

    /// Decode a record produced by [`Rtc::encode`]. The caller checks the
    /// length.
    pub(crate) fn decode(record: &[u8]) -> Self {
        debug_assert_eq!(record.len(), RTC_RECORD_LEN);
        let mut stamp = [0u8; 8];
        stamp.copy_from_slice(&record[40..48]);
        Self {
            live: RtcRegisters::decode(&record[..20]),
            latched: RtcRegisters::decode(&record[20..40]),
            reference: u64::from_le_bytes(stamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn advances_through_minutes_hours_and_days() {
        let mut rtc = Rtc::new(1_000);
        rtc.sync(1_000 + DAY + 3 * 3600 + 4 * 60 + 5);

        assert_eq!(rtc.live.seconds, 5);
        assert_eq!(rtc.live.minutes, 4);
        assert_eq!(rtc.live.hours, 3);
        assert_eq!(rtc.live.days, 1);
        assert!(!rtc.live.carry);
        assert_eq!(rtc.reference, 1_000 + DAY + 3 * 3600 + 4 * 60 + 5);
    }

    #[test]
    fn halted_clock_drops_elapsed_time() {
        let mut rtc = Rtc::new(0);
        rtc.write(RtcRegister::DayHigh, DAY_HIGH_HALT);
        rtc.sync(500);
        assert_eq!(rtc.live.seconds, 0);
        assert_eq!(rtc.reference, 500);

        rtc.write(RtcRegister::DayHigh, 0);
        rtc.sync(510);
        assert_eq!(rtc.live.seconds, 10);
    }

    #[test]
    fn day_overflow_sets_carry_and_wraps() {
        let mut rtc = Rtc::new(0);
        rtc.live.seconds = 59;
        rtc.live.minutes = 59;
        rtc.live.hours = 23;
        rtc.live.days = MAX_DAY;

        rtc.sync(1);
        assert_eq!(rtc.live.days, 0);
        assert!(rtc.live.carry);

        // Carry stays set until software clears it.
        rtc.sync(1 + DAY);
        assert_eq!(rtc.live.days, 1);
        assert!(rtc.live.carry);
    }

    #[test]
    fn huge_elapsed_time_wraps_whole_cycles() {
        let mut rtc = Rtc::new(0);
        rtc.sync(u64::MAX);
        assert!(rtc.live.carry);

        let mut expected = RtcRegisters::default();
        expected.advance(u64::MAX % FULL_CYCLE);
        expected.carry = true;
        assert_eq!(rtc.live, expected);
        assert_eq!(rtc.reference, u64::MAX);

        let mut regs = RtcRegisters::default();
        regs.advance(FULL_CYCLE + 61);
        assert_eq!((regs.seconds, regs.minutes, regs.days), (1, 1, 0));
        assert!(regs.carry);
    }

    #[test]
    fn out_of_range_values_tick_like_hardware() {
        let mut regs = RtcRegisters {
            seconds: 59,
            minutes: 60,
            ..Default::default()
        };
        regs.advance(1);
        assert_eq!((regs.seconds, regs.minutes), (0, 61));

        let mut regs = RtcRegisters {
            seconds: 63,
            minutes: 5,
            ..Default::default()
        };
        regs.advance(1);
        assert_eq!((regs.seconds, regs.minutes), (0, 5));

        let mut regs = RtcRegisters {
            seconds: 59,
            minutes: 59,
            hours: 24,
            ..Default::default()
        };
        regs.advance(1);
        assert_eq!((regs.seconds, regs.minutes, regs.hours), (0, 0, 25));
    }

    #[test]
    fn out_of_range_then_bulk_advance() {
        let mut regs = RtcRegisters {
            seconds: 62,
            ..Default::default()
        };
        // 62 -> 63 -> 0 takes two seconds without a minute carry, then
        // 120 more seconds add two minutes.
        regs.advance(2 + 120);
        assert_eq!((regs.seconds, regs.minutes), (0, 2));
    }

    #[test]
    fn reads_come_from_latched_copy_with_unused_bits_set() {
        let mut rtc = Rtc::new(0);
        rtc.sync(42);
        assert_eq!(rtc.read(RtcRegister::Seconds), 0xC0);

        rtc.latch();
        assert_eq!(rtc.read(RtcRegister::Seconds), 0xC0 | 42);

        rtc.sync(50);
        assert_eq!(rtc.read(RtcRegister::Seconds), 0xC0 | 42);
    }

    #[test]
    fn day_high_packs_bit8_halt_and_carry() {
        let mut rtc = Rtc::new(0);
        rtc.write(RtcRegister::DayLow, 0x34);
        rtc.write(RtcRegister::DayHigh, 0xC1);
        assert_eq!(rtc.live.days, 0x134);
        assert!(rtc.live.halt);
        assert!(rtc.live.carry);

        rtc.latch();
        assert_eq!(rtc.read(RtcRegister::DayLow), 0x34);
        assert_eq!(rtc.read(RtcRegister::DayHigh), 0xC1 | 0x3E);
    }

    #[test]
    fn record_layout_is_stable() {
        let mut rtc = Rtc::new(0x0102_0304_0506_0708);
        rtc.live = RtcRegisters {
            seconds: 1,
            minutes: 2,
            hours: 3,
            days: 0x104,
            halt: true,
            carry: false,
        };
        let mut out = Vec::new();
        rtc.encode(&mut out);

        assert_eq!(out.len(), RTC_RECORD_LEN);
        assert_eq!(&out[0..4], &[1, 0, 0, 0]);
        assert_eq!(&out[12..16], &[0x04, 0, 0, 0]);
        assert_eq!(&out[16..20], &[0x41, 0, 0, 0]);
        assert_eq!(&out[40..48], &0x0102_0304_0506_0708u64.to_le_bytes());
        assert_eq!(Rtc::decode(&out), rtc);
    }
}
