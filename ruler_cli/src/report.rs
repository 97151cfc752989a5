use anyhow::Result;
use geo_types::Point;
use map_ruler_lib::{recording::RecordingSurface, LabelFormat, RulerControl, RulerInput, RulerOptions, Unit};

/// Runs the points through a fresh measuring session and returns the labels.
pub fn measure(points: &[Point], units: Unit, label_format: LabelFormat) -> Result<Vec<String>> {
    let options = RulerOptions::default().with_units(units).with_label_format(label_format);
    let mut ruler = RulerControl::new(RecordingSurface::new(), options)?;

    ruler.start();
    for point in points {
        ruler.on_capture(*point);
    }
    let labels = ruler.labels().to_vec();
    ruler.stop();

    Ok(labels)
}

/// Popup html on a single terminal line.
pub fn plain(label: &str) -> String {
    label.replace("<br/>", "  ")
}

pub fn print_labels(labels: &[String]) {
    for (i, label) in labels.iter().enumerate() {
        println!("{}\t{}", i, plain(label));
    }
}
