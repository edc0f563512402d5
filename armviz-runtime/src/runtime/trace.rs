// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::{Path, PathBuf};

use armviz_core::ReachabilityGrid;

use super::Result;

pub trait Tracer {
    type Instance: TraceWriter;

    /// Construct the tracer rooted at a directory.
    fn from_path<P: AsRef<Path>>(path: P) -> Self;

    /// Open a named trace.
    fn instance(&self, name: &str) -> Result<Self::Instance>;
}

pub trait TraceWriter {
    /// Append a single record to the trace.
    fn write_record<T: serde::Serialize>(&mut self, record: T) -> Result;

    /// Flush buffered records.
    fn flush(&mut self) -> Result {
        Ok(())
    }
}

pub struct NullTracer;

impl Tracer for NullTracer {
    type Instance = NullTracerInstance;

    fn from_path<P: AsRef<Path>>(_: P) -> Self {
        Self {}
    }

    fn instance(&self, _: &str) -> Result<Self::Instance> {
        Ok(Self::Instance {})
    }
}

pub struct NullTracerInstance;

impl TraceWriter for NullTracerInstance {
    fn write_record<T: serde::Serialize>(&mut self, _: T) -> Result {
        Ok(())
    }
}

pub struct CsvTracer(PathBuf);

impl Tracer for CsvTracer {
    type Instance = CsvTracerInstance;

    fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self(path.as_ref().to_path_buf())
    }

    fn instance(&self, name: &str) -> Result<Self::Instance> {
        std::fs::create_dir_all(&self.0)?;

        let path = self.0.join(name.to_owned() + "_trace0.csv");
        log::debug!("Tracing to {}", path.display());

        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::NonNumeric)
            .has_headers(true)
            .from_path(path)?;

        Ok(Self::Instance { writer })
    }
}

pub struct CsvTracerInstance {
    writer: csv::Writer<std::fs::File>,
}

impl TraceWriter for CsvTracerInstance {
    fn write_record<T: serde::Serialize>(&mut self, record: T) -> Result {
        Ok(self.writer.serialize(record)?)
    }

    fn flush(&mut self) -> Result {
        Ok(self.writer.flush()?)
    }
}

#[derive(serde_derive::Serialize)]
struct HeatmapRecord {
    /// Grid column.
    x: usize,
    /// Grid row.
    y: usize,
    /// Best observed score.
    score: f32,
    /// Grayscale intensity.
    brightness: u8,
}

/// Write every reached cell of the grid to a CSV file.
///
/// Returns the number of cells written.
pub fn write_heatmap<P: AsRef<Path>>(path: P, grid: &ReachabilityGrid) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;

    for (y, row) in grid.rows().enumerate() {
        for (x, score) in row.iter().enumerate() {
            if !grid.is_reached(x, y) {
                continue;
            }

            writer.serialize(HeatmapRecord {
                x,
                y,
                score: *score,
                brightness: grid.brightness(x, y).unwrap_or_default(),
            })?;
            count += 1;
        }
    }

    writer.flush()?;

    Ok(count)
}
