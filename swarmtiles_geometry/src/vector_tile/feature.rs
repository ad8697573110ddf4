use super::{GeomType, PropertyInterner};
use crate::{
	GeometryError,
	geo::{GeoFeature, Geometry, ring_area},
};
use anyhow::{Context, Result, bail};
use byteorder::LE;
use swarmtiles_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};

const CMD_MOVE_TO: u32 = 1;
const CMD_LINE_TO: u32 = 2;
const CMD_CLOSE_PATH: u32 = 7;

/// One feature as stored in a layer: interned tag pairs plus the
/// command-encoded geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl VectorTileFeature {
	pub fn new(id: Option<u64>, tag_ids: Vec<u32>, geom_type: GeomType, geom_data: Blob) -> VectorTileFeature {
		VectorTileFeature {
			id,
			tag_ids,
			geom_type,
			geom_data,
		}
	}

	/// Interns the feature's properties and encodes its geometry.
	pub fn from_geo_feature(feature: GeoFeature, interner: &mut PropertyInterner) -> Result<VectorTileFeature> {
		let tag_ids = interner.encode_tags(&feature.properties);
		VectorTileFeature::from_geometry(feature.id, tag_ids, &feature.geometry)
	}

	pub fn from_geometry(id: Option<u64>, tag_ids: Vec<u32>, geometry: &Geometry) -> Result<VectorTileFeature> {
		Ok(VectorTileFeature {
			id,
			tag_ids,
			geom_type: GeomType::from(geometry),
			geom_data: encode_geometry(geometry)?,
		})
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut feature = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => feature.id = Some(reader.read_varint().context("Failed to read feature id")?),
				(2, 2) => {
					feature.tag_ids = reader
						.read_pbf_packed_uint32()
						.context("Failed to read feature tag IDs")?;
				}
				(3, 0) => {
					feature.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?);
				}
				(4, 2) => feature.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(feature)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0)?;
			writer.write_varint(id)?;
		}
		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2)?;
			writer.write_pbf_packed_uint32(&self.tag_ids)?;
		}
		writer.write_pbf_key(3, 0)?;
		writer.write_varint(self.geom_type.as_u64())?;
		writer.write_pbf_key(4, 2)?;
		writer.write_pbf_blob(&self.geom_data)?;

		Ok(writer.into_blob())
	}

	/// Replays the geometry commands back into the model.
	///
	/// The reader is lenient where the wire allows variation: any
	/// closepath count is accepted, and polygon rings are grouped by
	/// winding since the wire stores them flat.
	pub fn to_geometry(&self) -> Result<Geometry> {
		let lines = self.decode_lines()?;

		Ok(match self.geom_type {
			GeomType::MultiPoint => Geometry::MultiPoint(lines.into_iter().flatten().collect()),
			GeomType::MultiLineString => Geometry::MultiLineString(lines),
			GeomType::MultiPolygon => {
				let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();
				for ring in lines {
					let area = ring_area(&ring);
					if area > 1e-14 {
						polygons.push(vec![ring]);
					} else if area < -1e-14 {
						match polygons.last_mut() {
							Some(polygon) => polygon.push(ring),
							None => bail!("Polygon geometry starts with an interior ring"),
						}
					}
					// rings with near-zero area carry no surface, drop them
				}
				Geometry::MultiPolygon(polygons)
			}
			GeomType::Unknown => Geometry::Unknown,
		})
	}

	pub fn to_geo_feature(&self, interner: &PropertyInterner) -> Result<GeoFeature> {
		Ok(GeoFeature {
			id: self.id,
			geometry: self.to_geometry().context("Failed to decode feature geometry")?,
			properties: interner.decode_tags(&self.tag_ids).context("Failed to decode feature tags")?,
		})
	}

	fn decode_lines(&self) -> Result<Vec<Vec<[f64; 2]>>> {
		let mut reader = ValueReaderSlice::new_le(self.geom_data.as_slice());
		let mut lines: Vec<Vec<[f64; 2]>> = Vec::new();
		let mut line: Vec<[f64; 2]> = Vec::new();
		let mut x = 0i32;
		let mut y = 0i32;

		while reader.has_remaining() {
			let value = reader.read_varint().context("Failed to read geometry command")?;
			let cmd = (value & 0x7) as u32;
			let count = (value >> 3) as u32;
			match cmd {
				CMD_MOVE_TO | CMD_LINE_TO => {
					if cmd == CMD_MOVE_TO && !line.is_empty() {
						lines.push(line);
						line = Vec::new();
					}
					read_points(&mut reader, &mut line, &mut x, &mut y, count)?;
				}
				CMD_CLOSE_PATH => {
					if !line.is_empty() {
						line.push(line[0]);
					}
				}
				_ => bail!("Unknown geometry command ({cmd})"),
			}
		}
		if !line.is_empty() {
			lines.push(line);
		}

		Ok(lines)
	}
}

fn read_points(
	reader: &mut ValueReaderSlice<LE>,
	line: &mut Vec<[f64; 2]>,
	x: &mut i32,
	y: &mut i32,
	count: u32,
) -> Result<()> {
	for _ in 0..count {
		*x += reader.read_svarint32().context("Failed to read x delta")?;
		*y += reader.read_svarint32().context("Failed to read y delta")?;
		line.push([f64::from(*x), f64::from(*y)]);
	}
	Ok(())
}

fn command(cmd: u32, count: u32) -> u64 {
	u64::from((count << 3) | (cmd & 0x7))
}

/// Encodes a geometry into the command stream of field 4.
///
/// The running position starts at `(0, 0)` once per geometry and is
/// never reset between parts or rings. Coordinates are rounded to the
/// integer grid before the delta is taken, so rounding error does not
/// accumulate along a part.
fn encode_geometry(geometry: &Geometry) -> Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();
	let mut x = 0i32;
	let mut y = 0i32;

	match geometry {
		Geometry::MultiPoint(points) => {
			if points.is_empty() {
				return Err(GeometryError::malformed("multipoint with no points").into());
			}
			writer.write_varint(command(CMD_MOVE_TO, points.len() as u32))?;
			for point in points {
				write_point(&mut writer, &mut x, &mut y, point)?;
			}
		}
		Geometry::MultiLineString(lines) => {
			if lines.is_empty() {
				return Err(GeometryError::malformed("multilinestring with no parts").into());
			}
			for line in lines {
				if line.len() < 2 {
					return Err(GeometryError::malformed(format!("line part has {} points, needs at least 2", line.len())).into());
				}
				writer.write_varint(command(CMD_MOVE_TO, 1))?;
				write_point(&mut writer, &mut x, &mut y, &line[0])?;
				writer.write_varint(command(CMD_LINE_TO, (line.len() - 1) as u32))?;
				for point in &line[1..] {
					write_point(&mut writer, &mut x, &mut y, point)?;
				}
			}
		}
		Geometry::MultiPolygon(polygons) => {
			if polygons.is_empty() {
				return Err(GeometryError::malformed("multipolygon with no parts").into());
			}
			for polygon in polygons {
				if polygon.is_empty() {
					return Err(GeometryError::malformed("polygon part with no rings").into());
				}
				for ring in polygon {
					// the closing duplicate is implicit in closepath
					let mut points = ring.as_slice();
					if points.len() > 1 && points.first() == points.last() {
						points = &points[..points.len() - 1];
					}
					if points.len() < 3 {
						return Err(GeometryError::malformed(format!("ring has {} points, needs at least 3", points.len())).into());
					}
					writer.write_varint(command(CMD_MOVE_TO, 1))?;
					write_point(&mut writer, &mut x, &mut y, &points[0])?;
					writer.write_varint(command(CMD_LINE_TO, (points.len() - 1) as u32))?;
					for point in &points[1..] {
						write_point(&mut writer, &mut x, &mut y, point)?;
					}
					writer.write_varint(command(CMD_CLOSE_PATH, 1))?;
				}
			}
		}
		Geometry::Unknown => {}
	}

	Ok(writer.into_blob())
}

fn write_point(writer: &mut ValueWriterBlob<LE>, x: &mut i32, y: &mut i32, point: &[f64; 2]) -> Result<()> {
	let px = point[0].round() as i32;
	let py = point[1].round() as i32;
	writer.write_svarint32(px - *x)?;
	writer.write_svarint32(py - *y)?;
	*x = px;
	*y = py;
	Ok(())
}
