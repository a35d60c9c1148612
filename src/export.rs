use crate::record::CanonicalCatch;
use csv::Writer;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One CSV line per catch. The raw sighting is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatchRow<'a> {
    id: &'a str,
    name: &'a str,
    family: &'a str,
    water_type: &'a str,
    region: &'a str,
    environment: &'a str,
    conservation_status: &'a str,
    min_size: Option<f64>,
    max_size: Option<f64>,
    depth_range_min: Option<f64>,
    depth_range_max: Option<f64>,
    ai_accuracy: Option<f64>,
    created_at: &'a str,
    image_url: &'a str,
}

impl<'a> From<&'a CanonicalCatch> for CatchRow<'a> {
    fn from(c: &'a CanonicalCatch) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            family: &c.family,
            water_type: &c.water_type,
            region: &c.region,
            environment: &c.environment,
            conservation_status: &c.conservation_status,
            min_size: c.min_size,
            max_size: c.max_size,
            depth_range_min: c.depth_range_min,
            depth_range_max: c.depth_range_max,
            ai_accuracy: c.ai_accuracy,
            created_at: &c.created_at,
            image_url: &c.image_url,
        }
    }
}

pub fn write_csv<W: Write>(
    catches: &[CanonicalCatch],
    out: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = Writer::from_writer(out);
    for catch in catches {
        writer.serialize(CatchRow::from(catch))?;
    }
    writer.flush()?;
    Ok(())
}

/// Save catches to a CSV file
pub fn save_to_csv(
    catches: &[CanonicalCatch],
    filename: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filename = filename.as_ref();
    let file = std::fs::File::create(filename)?;
    write_csv(catches, file)?;
    info!("Saved {} catches to {}", catches.len(), filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::to_canonical;
    use crate::resolve::ImageResolver;
    use serde_json::json;

    fn sample() -> Vec<CanonicalCatch> {
        let resolver = ImageResolver::new("http://localhost:3000/api");
        vec![
            to_canonical(
                json!({"fishId": "7", "imageUrl": "d/a.jpg", "fish": {"name": "Cod", "minSize": 30}}),
                &resolver,
            ),
            to_canonical(json!({}), &resolver),
        ]
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,name,family,waterType,region,environment,conservationStatus,minSize,maxSize,\
             depthRangeMin,depthRangeMax,aiAccuracy,createdAt,imageUrl"
        );
        assert_eq!(
            lines.next().unwrap(),
            "7,Cod,,,,,,30.0,,,,,,http://localhost:3000/api/fish/image/d/a.jpg"
        );
        assert_eq!(lines.next().unwrap(), ",Unknown,,,,,,,,,,,,");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_save_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catches.csv");
        save_to_csv(&sample(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
