use std::{
    fs::{self, OpenOptions},
    io::{BufWriter, Cursor, Write},
    path::Path,
};

use image::{ImageFormat, RgbaImage};

use crate::err;

pub fn encode_png(img: &RgbaImage) -> eyre::Result<Vec<u8>> {
    let (width, height) = img.dimensions();

    if width == 0 || height == 0 {
        return err!("cannot encode an empty {width}x{height} image");
    }

    let mut bytes = Cursor::new(vec![]);
    img.write_to(&mut bytes, ImageFormat::Png)?;

    Ok(bytes.into_inner())
}

pub fn save_png(path: &Path, img: &RgbaImage) -> eyre::Result<()> {
    let bytes = encode_png(img)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_decode() {
        let rgba: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        let img = RgbaImage::from_raw(2, 3, rgba.clone()).unwrap();
        let png = encode_png(&img).unwrap();

        assert_eq!(&png[1..4], b"PNG");

        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.into_raw(), rgba);
    }

    #[test]
    fn empty_image() {
        assert!(encode_png(&RgbaImage::new(0, 0)).is_err());
        assert!(encode_png(&RgbaImage::new(3, 0)).is_err());
    }
}
