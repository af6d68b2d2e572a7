/// Terminal bell, written on rejected scans.
pub const BELL: &str = "\x07";
pub const BAR_WIDTH: usize = 20;
pub const BAR_FILLED: char = '#';
pub const BAR_EMPTY: char = '.';
/// Rows shown after each scan; `:status` shows every line.
pub const COMPACT_ROWS: usize = 5;
pub const MARKER_RECENT: char = '>';
