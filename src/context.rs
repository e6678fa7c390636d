//! Per-frame and process-wide parsing context bitsets.

use bitflags::bitflags;

bitflags! {
    /// The parsing sub-state of a single frame.
    ///
    /// The three `TEMPLATE_*` bits are mutually exclusive sub-phases of
    /// template parsing; the six `HEADING_LEVEL_*` bits encode the outline
    /// level of a heading frame, with exactly one ever set at a time.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct Context: u16 {
        /// Parsing a template's name, before the first `|`.
        const TEMPLATE_NAME = 1 << 0;
        /// Parsing a template parameter's key, after `|` and before `=`.
        const TEMPLATE_PARAM_KEY = 1 << 1;
        /// Parsing a template parameter's value, after `=`.
        const TEMPLATE_PARAM_VALUE = 1 << 2;
        /// Inside a level-1 heading (`=...=`).
        const HEADING_LEVEL_1 = 1 << 3;
        /// Inside a level-2 heading (`==...==`).
        const HEADING_LEVEL_2 = 1 << 4;
        /// Inside a level-3 heading (`===...===`).
        const HEADING_LEVEL_3 = 1 << 5;
        /// Inside a level-4 heading (`====...====`).
        const HEADING_LEVEL_4 = 1 << 6;
        /// Inside a level-5 heading (`=====...=====`).
        const HEADING_LEVEL_5 = 1 << 7;
        /// Inside a level-6 heading (`======...======`).
        const HEADING_LEVEL_6 = 1 << 8;
    }
}

impl Context {
    /// The union of all template sub-phase bits.
    pub(crate) const TEMPLATE: Self = Self::from_bits_truncate(
        Self::TEMPLATE_NAME.bits() | Self::TEMPLATE_PARAM_KEY.bits() | Self::TEMPLATE_PARAM_VALUE.bits(),
    );

    /// The union of all heading level bits.
    pub(crate) const HEADING: Self = Self::from_bits_truncate(
        Self::HEADING_LEVEL_1.bits()
            | Self::HEADING_LEVEL_2.bits()
            | Self::HEADING_LEVEL_3.bits()
            | Self::HEADING_LEVEL_4.bits()
            | Self::HEADING_LEVEL_5.bits()
            | Self::HEADING_LEVEL_6.bits(),
    );

    /// Builds the context for entering a heading frame whose opening `=` run
    /// is `run_length` characters long, clamping the encoded level to 6.
    pub(crate) fn heading_level(run_length: usize) -> Self {
        let shift = run_length.saturating_sub(1).min(5);
        Self::from_bits_retain(Self::HEADING_LEVEL_1.bits() << shift)
    }

    /// Recovers the heading level (1..=6) encoded by this context's heading
    /// bit.
    ///
    /// Only meaningful (and only ever called) on a context with exactly one
    /// `HEADING_LEVEL_*` bit set.
    pub(crate) fn level(self) -> u8 {
        let bits = (self & Self::HEADING).bits();
        debug_assert!(bits != 0 && bits.is_power_of_two());
        (bits.trailing_zeros() - Self::HEADING_LEVEL_1.bits().trailing_zeros() + 1) as u8
    }
}

bitflags! {
    /// Process-wide parsing state, shared across every frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct Global: u8 {
        /// Set while any heading is under construction, preventing headings
        /// from nesting inside each other.
        const HEADING = 1 << 0;
    }
}
