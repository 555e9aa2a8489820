//! Image region filtering.

use crate::config::Config;
use crate::geometry::BBox;
use crate::input::ImagePrimitive;
use crate::model::Image;

/// Filter raw image primitives into the retained page images.
///
/// Images below the minimum pixel area are dropped, as is everything when
/// `image_flag` is off. With `logo_flag` set, images overlapping the header
/// band are treated as logos and dropped too.
pub fn filter_images(
    images: &[ImagePrimitive],
    page_height: f32,
    config: &Config,
) -> Vec<Image> {
    if !config.image_flag {
        return vec![];
    }

    let header_band = if config.logo_flag {
        Some(BBox::new(
            f32::NEG_INFINITY,
            0.0,
            f32::INFINITY,
            page_height * config.head_tail_page_offset_percent,
        ))
    } else {
        None
    };

    let mut out = Vec::with_capacity(images.len());
    for raw in images {
        if raw.pixel_area() < config.min_image_size {
            log::debug!(
                "dropping image at {:?}: {}px below minimum",
                raw.bbox,
                raw.pixel_area()
            );
            continue;
        }
        if let Some(band) = &header_band {
            if raw.bbox.intersection_area(band) > 0.0 {
                log::debug!("dropping logo-like image at {:?}", raw.bbox);
                continue;
            }
        }
        out.push(Image {
            bbox: raw.bbox,
            width: raw.width,
            height: raw.height,
            bits: raw.bits,
            srcsize: raw.srcsize,
            format: raw.format.clone(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(x0: f32, y0: f32, w: u32, h: u32) -> ImagePrimitive {
        ImagePrimitive {
            bbox: BBox::new(x0, y0, x0 + w as f32, y0 + h as f32),
            srcsize: (w * h) as u64,
            width: w,
            height: h,
            bits: 8,
            format: "png".to_string(),
        }
    }

    #[test]
    fn test_small_image_dropped_large_kept() {
        let mut config = Config::default();
        config.min_image_size = 200.0;
        // 10x10 = 100px is below the minimum, 20x20 = 400px survives.
        let small = image(100.0, 100.0, 10, 10);
        let large = image(100.0, 300.0, 20, 20);
        let kept = filter_images(&[small, large], 800.0, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!((kept[0].width, kept[0].height), (20, 20));
    }

    #[test]
    fn test_image_flag_disables_all() {
        let mut config = Config::default();
        config.image_flag = false;
        let kept = filter_images(&[image(0.0, 300.0, 50, 50)], 800.0, &config);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_logo_in_header_band_dropped() {
        // Header band is the top 5% of an 800pt page: y < 40.
        let logo = image(10.0, 10.0, 30, 20);
        let body = image(10.0, 300.0, 30, 20);
        let kept = filter_images(&[logo.clone(), body], 800.0, &Config::default());
        assert_eq!(kept.len(), 1);
        assert!(kept[0].bbox.y0 > 40.0);

        let mut config = Config::default();
        config.logo_flag = false;
        let kept = filter_images(&[logo, image(10.0, 300.0, 30, 20)], 800.0, &config);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_metadata_carried_through() {
        let kept = filter_images(&[image(0.0, 300.0, 40, 30)], 800.0, &Config::default());
        let img = &kept[0];
        assert_eq!(img.srcsize, 1200);
        assert_eq!(img.bits, 8);
        assert_eq!(img.format, "png");
        assert_eq!(img.pixel_area(), 1200.0);
    }
}
