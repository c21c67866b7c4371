use std::io::{self, Write};

use crate::tally::Tally;

/// Writes `<login> <count>` lines in the tally's iteration order.
pub fn write_report<W: Write>(tally: &Tally, out: &mut W) -> io::Result<()> {
    for (login, count) in tally.iter() {
        writeln!(out, "{login} {count}")?;
    }

    out.flush()
}
