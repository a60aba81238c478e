use crate::image_decoder::{decode_path, DecodeError};
use image::{imageops, RgbImage};
use rand::Rng;
use std::path::{Path, PathBuf};

pub struct Thumbnail {
    pub caption: String,
    pub path: PathBuf,
    pub image: Result<RgbImage, DecodeError>,
}

/// The bundled sample photos offered when nothing has been uploaded.
#[derive(Debug, Clone)]
pub struct SampleDeck {
    paths: Vec<PathBuf>,
}

impl SampleDeck {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        if self.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.paths.len());
        Some(self.paths[index].as_path())
    }

    /// Decodes every sample and scales it to `width`, keeping the aspect ratio.
    /// A sample that fails to decode keeps its error so the gallery can say so.
    pub fn thumbnails(&self, width: u32) -> Vec<Thumbnail> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, path)| Thumbnail {
                caption: format!("Sample {}", i + 1),
                path: path.clone(),
                image: decode_path(path).map(|image| thumbnail(&image, width)),
            })
            .collect()
    }
}

pub fn thumbnail(image: &RgbImage, width: u32) -> RgbImage {
    let width = width.max(1);
    let height = ((image.height() as u64 * width as u64) / image.width().max(1) as u64).max(1) as u32;
    imageops::resize(image, width, height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_decoder::encode;
    use image::{ImageFormat, Rgb};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck() -> SampleDeck {
        SampleDeck::new(vec![
            PathBuf::from("test_image/autobahn.jpg"),
            PathBuf::from("test_image/bad_road.jpg"),
            PathBuf::from("test_image/sample5.jpg"),
            PathBuf::from("test_image/sample1.jpg"),
        ])
    }

    #[test]
    fn test_same_seed_picks_same_samples() {
        let deck = deck();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);

        let picks_a: Vec<_> = (0..16).map(|_| deck.pick(&mut a).unwrap().to_path_buf()).collect();
        let picks_b: Vec<_> = (0..16).map(|_| deck.pick(&mut b).unwrap().to_path_buf()).collect();

        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_every_sample_can_be_picked() {
        let deck = deck();
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(deck.pick(&mut rng).unwrap().to_path_buf());
        }

        assert_eq!(seen.len(), deck.len());
    }

    #[test]
    fn test_empty_deck_picks_nothing() {
        let deck = SampleDeck::new(vec![]);
        assert!(deck.pick(&mut StdRng::seed_from_u64(0)).is_none());
    }

    #[test]
    fn test_thumbnail_keeps_aspect_ratio() {
        let image = RgbImage::from_pixel(600, 400, Rgb([1, 2, 3]));

        assert_eq!(thumbnail(&image, 150).dimensions(), (150, 100));
        assert_eq!(thumbnail(&RgbImage::new(1000, 1), 150).dimensions(), (150, 1));
    }

    #[test]
    fn test_thumbnails_report_missing_files() {
        let path = std::env::temp_dir().join(format!(
            "road-quality-detector-thumb-{}.png",
            std::process::id()
        ));
        std::fs::write(
            &path,
            encode(&RgbImage::new(300, 200), ImageFormat::Png).unwrap(),
        )
        .unwrap();
        let deck = SampleDeck::new(vec![path.clone(), PathBuf::from("test_image/missing.jpg")]);

        let thumbnails = deck.thumbnails(150);
        let _ = std::fs::remove_file(&path);

        assert_eq!(thumbnails.len(), 2);
        assert_eq!(thumbnails[0].caption, "Sample 1");
        assert_eq!(thumbnails[0].image.as_ref().unwrap().dimensions(), (150, 100));
        assert_eq!(thumbnails[1].caption, "Sample 2");
        assert!(thumbnails[1].image.is_err());
    }
}
