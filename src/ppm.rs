//! ASCII PPM (P3) image output
//!
//! One RGB triple per line after the `P3` / dimensions / maxval header.
//! Channels are clamped to [0, 1] before quantizing to 0..=255.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SimError;
use crate::kernels::RenderTarget;

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}

/// Write a render target's color buffer to `w` in P3 form
pub fn write_ppm<W: Write>(w: &mut W, target: &RenderTarget) -> Result<(), SimError> {
    writeln!(w, "P3")?;
    writeln!(w, "{} {}", target.width, target.height)?;
    writeln!(w, "255")?;
    for color in &target.color {
        writeln!(
            w,
            "{} {} {}",
            quantize(color[0]),
            quantize(color[1]),
            quantize(color[2])
        )?;
    }
    Ok(())
}

/// Write the color buffer to a file, buffered
pub fn save_ppm<P: AsRef<Path>>(path: P, target: &RenderTarget) -> Result<(), SimError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, target)?;
    writer.flush()?;
    log::debug!(
        "wrote {}x{} ppm to {}",
        target.width,
        target.height,
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let mut target = RenderTarget::new(2, 1);
        target.color[0] = [1.0, 0.0, 0.5];
        target.color[1] = [-0.5, 2.0, 0.0];

        let mut out = Vec::new();
        write_ppm(&mut out, &target).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "P3");
        assert_eq!(lines[1], "2 1");
        assert_eq!(lines[2], "255");
        assert_eq!(lines[3], "255 0 127");
        // out-of-range channels clamp
        assert_eq!(lines[4], "0 255 0");
        assert_eq!(lines.len(), 5);
    }
}
