//! ASCII XYZ point cloud format support
//!
//! Lines of whitespace-separated floats, either `x y z` or
//! `x y z nx ny nz`. The column layout is detected from the first data
//! line; blank lines are skipped anywhere in the file.

use log::debug;
use pointscope_core::{Error, Point3f, PointCloud, Result, SamplePoint, Vector3f};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Column layout of an XYZ file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyzLayout {
    /// `x y z`
    Position,
    /// `x y z nx ny nz`
    PositionNormal,
}

impl XyzLayout {
    /// Detect the layout from one data line
    pub fn detect_from_line(line: &str) -> Result<Self> {
        match line.split_whitespace().count() {
            3 => Ok(XyzLayout::Position),
            6 => Ok(XyzLayout::PositionNormal),
            n => Err(Error::InvalidData(format!(
                "expected 3 or 6 columns, found {n}"
            ))),
        }
    }

    fn columns(self) -> usize {
        match self {
            XyzLayout::Position => 3,
            XyzLayout::PositionNormal => 6,
        }
    }
}

/// XYZ reader implementation
pub struct XyzReader;

impl XyzReader {
    /// Read a point cloud from an XYZ file
    pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud<SamplePoint>> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut layout = None;
        let mut cloud = PointCloud::new();

        for (line_no, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let layout = match layout {
                Some(l) => l,
                None => {
                    let detected = XyzLayout::detect_from_line(&line)?;
                    layout = Some(detected);
                    detected
                }
            };
            cloud.push(Self::parse_line(&line, layout, line_no + 1)?);
        }

        debug!(
            "read {} points from {}",
            cloud.len(),
            path.as_ref().display()
        );
        Ok(cloud)
    }

    fn parse_line(line: &str, layout: XyzLayout, line_no: usize) -> Result<SamplePoint> {
        let values = line
            .split_whitespace()
            .map(|s| {
                s.parse::<f32>().map_err(|_| {
                    Error::InvalidData(format!("line {line_no}: invalid number {s:?}"))
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        if values.len() != layout.columns() {
            return Err(Error::InvalidData(format!(
                "line {line_no}: expected {} columns, found {}",
                layout.columns(),
                values.len()
            )));
        }

        let position = Point3f::new(values[0], values[1], values[2]);
        Ok(match layout {
            XyzLayout::Position => SamplePoint::new(position),
            XyzLayout::PositionNormal => SamplePoint::with_normal(
                position,
                Vector3f::new(values[3], values[4], values[5]),
            ),
        })
    }
}

/// XYZ writer implementation
pub struct XyzWriter;

impl XyzWriter {
    /// Write a point cloud to an XYZ file
    pub fn write_point_cloud<P: AsRef<Path>>(
        cloud: &PointCloud<SamplePoint>,
        path: P,
        with_normals: bool,
    ) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        for point in cloud.iter() {
            let p = point.position;
            if with_normals {
                let n = point.normal;
                writeln!(writer, "{} {} {} {} {} {}", p.x, p.y, p.z, n.x, n.y, n.z)?;
            } else {
                writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    #[test]
    fn test_read_positions() {
        let temp_file = "test_read_positions.xyz";
        fs::write(temp_file, "1.0 2.0 3.0\n\n4.0 5.0 6.0\n").unwrap();

        let cloud = XyzReader::read_point_cloud(temp_file).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0].position, Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(cloud[1].position, Point3f::new(4.0, 5.0, 6.0));

        fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_read_positions_with_normals() {
        let temp_file = "test_read_normals.xyz";
        fs::write(temp_file, "1 2 3 0 0 1\n4 5 6 0 1 0\n").unwrap();

        let cloud = XyzReader::read_point_cloud(temp_file).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud[0].normal, Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(cloud[1].normal, Vector3f::new(0.0, 1.0, 0.0));

        fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_read_rejects_bad_column_count() {
        let temp_file = "test_bad_columns.xyz";
        fs::write(temp_file, "1.0 2.0\n").unwrap();

        assert!(XyzReader::read_point_cloud(temp_file).is_err());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_read_rejects_inconsistent_rows() {
        let temp_file = "test_inconsistent.xyz";
        fs::write(temp_file, "1 2 3\n4 5 6 0 0 1\n").unwrap();

        assert!(XyzReader::read_point_cloud(temp_file).is_err());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_read_rejects_non_numeric() {
        let temp_file = "test_non_numeric.xyz";
        fs::write(temp_file, "1.0 2.0 abc\n").unwrap();

        assert!(XyzReader::read_point_cloud(temp_file).is_err());

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let temp_file = "test_roundtrip.xyz";
        let cloud = PointCloud::from_points(vec![
            SamplePoint::new(Point3f::new(1.0, 2.0, 3.0)),
            SamplePoint::with_normal(Point3f::new(4.0, 5.0, 6.0), Vector3f::new(0.0, 1.0, 0.0)),
        ]);

        XyzWriter::write_point_cloud(&cloud, temp_file, true).unwrap();
        let loaded = XyzReader::read_point_cloud(temp_file).unwrap();

        assert_eq!(loaded.len(), cloud.len());
        for (written, read) in cloud.iter().zip(loaded.iter()) {
            assert_relative_eq!(written.position, read.position, epsilon = 1e-6);
            assert_relative_eq!(written.normal, read.normal, epsilon = 1e-6);
        }

        fs::remove_file(temp_file).unwrap();
    }
}
