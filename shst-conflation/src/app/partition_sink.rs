use std::{fs::File, path::Path};

use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};
use itertools::Itertools;
use serde::Serialize;

use crate::model::{partition::Partition, ConflationError};

/// receives the partitions of each conflated reference line, in partition order.
pub trait PartitionSink {
    fn write_partitions(
        &mut self,
        reference_id: &str,
        partitions: &[Partition],
    ) -> Result<(), ConflationError>;

    fn finish(&mut self) -> Result<(), ConflationError> {
        Ok(())
    }
}

impl PartitionSink for Vec<Partition> {
    fn write_partitions(
        &mut self,
        _reference_id: &str,
        partitions: &[Partition],
    ) -> Result<(), ConflationError> {
        self.extend(partitions.iter().cloned());
        Ok(())
    }
}

/// writes one gzipped CSV row per partition.
pub struct CsvPartitionWriter {
    filename: String,
    writer: csv::Writer<GzEncoder<File>>,
}

#[derive(Serialize)]
struct PartitionRow<'a> {
    reference_id: &'a str,
    segment_index: usize,
    total_segments: usize,
    from_intersection_id: &'a str,
    to_intersection_id: &'a str,
    start_dist_km: f64,
    end_dist_km: f64,
    osm_way_id: Option<i64>,
    road_class: Option<String>,
    one_way: Option<bool>,
    /// `;`-separated, empty where a synthetic vertex was inserted
    node_ids: String,
    /// JSON array of `[lon, lat]` pairs
    geometry: String,
    /// JSON object of source id to source metadata
    sources: String,
}

impl CsvPartitionWriter {
    /// creates `filename` in `directory`, refusing to replace an existing file unless
    /// `overwrite` is set.
    pub fn new(directory: &Path, filename: &str, overwrite: bool) -> Result<Self, ConflationError> {
        let filepath = directory.join(filename);
        if filepath.exists() && !overwrite {
            return Err(ConflationError::ConfigurationError(format!(
                "output file {} exists and overwrite is disabled",
                filepath.display()
            )));
        }
        let file = File::create(&filepath)
            .map_err(|e| ConflationError::CsvWriteError(filename.to_string(), csv::Error::from(e)))?;
        let buffer = GzEncoder::new(file, Compression::default());
        let writer = csv::WriterBuilder::new()
            .has_headers(true)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(buffer);
        Ok(Self {
            filename: filename.to_string(),
            writer,
        })
    }
}

impl PartitionSink for CsvPartitionWriter {
    fn write_partitions(
        &mut self,
        _reference_id: &str,
        partitions: &[Partition],
    ) -> Result<(), ConflationError> {
        for partition in partitions.iter() {
            let geometry = partition
                .geometry
                .0
                .iter()
                .map(|c| [c.x, c.y])
                .collect_vec();
            let row = PartitionRow {
                reference_id: &partition.reference_id,
                segment_index: partition.segment_index,
                total_segments: partition.total_segments,
                from_intersection_id: &partition.from_intersection_id,
                to_intersection_id: &partition.to_intersection_id,
                start_dist_km: partition.start_dist,
                end_dist_km: partition.end_dist,
                osm_way_id: partition.way_section.as_ref().map(|w| w.way_id.0),
                road_class: partition.way_section.as_ref().map(|w| w.road_class.to_string()),
                one_way: partition.way_section.as_ref().map(|w| w.one_way),
                node_ids: partition
                    .node_ids
                    .iter()
                    .map(|n| n.map(|n| n.to_string()).unwrap_or_default())
                    .join(";"),
                geometry: serde_json::to_string(&geometry).map_err(|e| {
                    ConflationError::InternalError(format!("failure encoding geometry: {e}"))
                })?,
                sources: serde_json::to_string(&partition.sources).map_err(|e| {
                    ConflationError::InternalError(format!("failure encoding sources: {e}"))
                })?,
            };
            self.writer
                .serialize(row)
                .map_err(|e| ConflationError::CsvWriteError(self.filename.clone(), e))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ConflationError> {
        self.writer
            .flush()
            .map_err(|e| ConflationError::CsvWriteError(self.filename.clone(), csv::Error::from(e)))
    }
}
