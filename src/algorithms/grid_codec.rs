//! Base-20 grid code encoding
//!
//! Converts a latitude/longitude pair into a short alphanumeric code naming a
//! rectangular cell, and decodes such a code back into the cell bounds.
//!
//! - Latitude and longitude are normalized to [0, 180) and [0, 360)
//! - Each axis is split into base-20 digits, most significant first
//! - Digits are interleaved pairwise (latitude, then longitude)
//! - A `+` separator follows the eighth digit position; shorter codes are
//!   padded with `0` up to the separator
//!
//! Cell resolution per pair: 20°, 1°, 0.05°, 0.0025°, 0.000125°.
//! Cells are half-open: a coordinate sitting exactly on an edge belongs to the
//! cell whose low edge it is. Latitude 90 is clamped into the top row of cells
//! and longitude 180 wraps onto -180.

use crate::algorithms::error::{CodecError, CodecResult};
use crate::core::{
    Coordinate, Polygon, CODE_ALPHABET, ENCODING_BASE, LATITUDE_MAX, LONGITUDE_MAX,
    MAX_CODE_LENGTH, PADDING_CHARACTER, PAIR_PRECISION, SEPARATOR, SEPARATOR_POSITION,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digit pairs at full precision
const MAX_PAIRS: u32 = (MAX_CODE_LENGTH / 2) as u32;

/// Finest-cell counts spanning each axis
const LAT_CELLS: i64 = 180 * PAIR_PRECISION;
const LON_CELLS: i64 = 360 * PAIR_PRECISION;

/// A validated grid code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridCode(String);

impl GridCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of meaningful digits (excludes padding and separator)
    pub fn code_length(&self) -> usize {
        significant_digits(&self.0)
    }

    /// Cell this code names
    pub fn area(&self) -> CodecResult<GridArea> {
        decode(&self.0)
    }
}

impl fmt::Display for GridCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GridCode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)?;
        Ok(GridCode(s.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for GridCode {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridCode> for String {
    fn from(code: GridCode) -> Self {
        code.0
    }
}

/// Rectangular cell named by a grid code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridArea {
    pub lat_lo: f64,
    pub lat_hi: f64,
    pub lon_lo: f64,
    pub lon_hi: f64,
    pub code_length: usize,
}

impl GridArea {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.lat_lo + self.lat_hi) / 2.0,
            (self.lon_lo + self.lon_hi) / 2.0,
        )
    }

    /// Half-open containment test: [lat_lo, lat_hi) x [lon_lo, lon_hi)
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.latitude >= self.lat_lo
            && coordinate.latitude < self.lat_hi
            && coordinate.longitude >= self.lon_lo
            && coordinate.longitude < self.lon_hi
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_hi - self.lat_lo
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_hi - self.lon_lo
    }

    /// Corners in ring order: south-west, south-east, north-east, north-west
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.lat_lo, self.lon_lo),
            Coordinate::new(self.lat_lo, self.lon_hi),
            Coordinate::new(self.lat_hi, self.lon_hi),
            Coordinate::new(self.lat_hi, self.lon_lo),
        ]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_coordinates(&self.corners())
    }
}

/// Finest-cell count covered by one digit of a pair at the given index
fn place_value(pair_index: u32) -> i64 {
    (ENCODING_BASE as i64).pow(MAX_PAIRS - 1 - pair_index)
}

fn digit_symbol(value: i64) -> char {
    CODE_ALPHABET[value as usize] as char
}

fn symbol_value(symbol: char) -> Option<i64> {
    let upper = u8::try_from(symbol).ok()?.to_ascii_uppercase();
    CODE_ALPHABET
        .iter()
        .position(|&c| c == upper)
        .map(|index| index as i64)
}

fn significant_digits(code: &str) -> usize {
    code.chars()
        .filter(|&c| c != SEPARATOR && c != PADDING_CHARACTER)
        .count()
}

fn validate_code_length(code_length: usize) -> CodecResult<()> {
    if code_length < 2 || code_length > MAX_CODE_LENGTH || code_length % 2 != 0 {
        return Err(CodecError::invalid_input(format!(
            "code length {} must be an even number between 2 and {}",
            code_length, MAX_CODE_LENGTH
        )));
    }
    Ok(())
}

/// Low edge, in degrees, of finest cell `index` on an axis offset by `max`
fn cell_edge(index: i64, max: f64) -> f64 {
    index as f64 / PAIR_PRECISION as f64 - max
}

/// Finest-cell index whose decoded bounds contain `value`
fn cell_index(value: f64, max: f64) -> i64 {
    let mut index = ((value + max) * PAIR_PRECISION as f64).floor() as i64;
    // The offset and scale can each round across an edge; settle against the
    // same arithmetic `decode` uses
    while index > 0 && cell_edge(index, max) > value {
        index -= 1;
    }
    while cell_edge(index + 1, max) <= value {
        index += 1;
    }
    index
}

/// Encode a coordinate into a grid code with `code_length` significant digits
pub fn encode(coordinate: Coordinate, code_length: usize) -> CodecResult<GridCode> {
    validate_code_length(code_length)?;

    if !coordinate.is_valid() {
        return Err(CodecError::invalid_input(format!(
            "coordinate ({}, {}) outside latitude [-90, 90] / longitude [-180, 180]",
            coordinate.latitude, coordinate.longitude
        )));
    }

    // Poles clamp into the top row; the antimeridian wraps onto -180
    let lat_index = cell_index(coordinate.latitude, LATITUDE_MAX).clamp(0, LAT_CELLS - 1);
    let lon_index = cell_index(coordinate.longitude, LONGITUDE_MAX).rem_euclid(LON_CELLS);

    let pairs = (code_length / 2) as u32;
    let mut code = String::with_capacity(MAX_CODE_LENGTH + 1);

    for pair in 0..pairs {
        let place = place_value(pair);
        code.push(digit_symbol((lat_index / place) % ENCODING_BASE as i64));
        code.push(digit_symbol((lon_index / place) % ENCODING_BASE as i64));

        if code.len() == SEPARATOR_POSITION {
            code.push(SEPARATOR);
        }
    }

    if code.len() < SEPARATOR_POSITION {
        while code.len() < SEPARATOR_POSITION {
            code.push(PADDING_CHARACTER);
        }
        code.push(SEPARATOR);
    }

    Ok(GridCode(code))
}

/// Split a code into its significant digits, validating layout
fn extract_digits(code: &str) -> CodecResult<Vec<i64>> {
    let chars: Vec<char> = code.chars().collect();

    let separators: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == SEPARATOR)
        .map(|(i, _)| i)
        .collect();

    match separators.as_slice() {
        [position] if *position == SEPARATOR_POSITION => {}
        [] => return Err(CodecError::malformed(code, "missing separator")),
        [_] => {
            return Err(CodecError::malformed(
                code,
                format!("separator must follow digit position {}", SEPARATOR_POSITION),
            ))
        }
        _ => return Err(CodecError::malformed(code, "more than one separator")),
    }

    let head = &chars[..SEPARATOR_POSITION];
    let tail = &chars[SEPARATOR_POSITION + 1..];

    let padding_start = head.iter().position(|&c| c == PADDING_CHARACTER);
    let head_digits = match padding_start {
        Some(start) => {
            if start == 0 || start % 2 != 0 {
                return Err(CodecError::malformed(code, "padding must start on a pair boundary"));
            }
            if head[start..].iter().any(|&c| c != PADDING_CHARACTER) {
                return Err(CodecError::malformed(code, "digits after padding"));
            }
            if !tail.is_empty() {
                return Err(CodecError::malformed(code, "padded code has digits after separator"));
            }
            &head[..start]
        }
        None => head,
    };

    if !tail.is_empty() && tail.len() != 2 {
        return Err(CodecError::malformed(
            code,
            format!("expected 0 or 2 digits after separator, found {}", tail.len()),
        ));
    }

    let digits = head_digits
        .iter()
        .chain(tail.iter())
        .map(|&c| {
            symbol_value(c)
                .ok_or_else(|| CodecError::malformed(code, format!("invalid character '{}'", c)))
        })
        .collect::<CodecResult<Vec<i64>>>()?;

    if digits[0] >= LAT_CELLS / place_value(0) {
        return Err(CodecError::malformed(code, "latitude digit out of range"));
    }
    if digits[1] >= LON_CELLS / place_value(0) {
        return Err(CodecError::malformed(code, "longitude digit out of range"));
    }

    Ok(digits)
}

/// Decode a grid code into the bounds of the cell it names
pub fn decode(code: &str) -> CodecResult<GridArea> {
    let digits = extract_digits(code)?;
    let pairs = (digits.len() / 2) as u32;

    let mut lat_index = 0i64;
    let mut lon_index = 0i64;
    for (pair, chunk) in digits.chunks_exact(2).enumerate() {
        let place = place_value(pair as u32);
        lat_index += chunk[0] * place;
        lon_index += chunk[1] * place;
    }

    let resolution = place_value(pairs - 1);

    Ok(GridArea {
        lat_lo: cell_edge(lat_index, LATITUDE_MAX),
        lat_hi: cell_edge(lat_index + resolution, LATITUDE_MAX),
        lon_lo: cell_edge(lon_index, LONGITUDE_MAX),
        lon_hi: cell_edge(lon_index + resolution, LONGITUDE_MAX),
        code_length: digits.len(),
    })
}

/// Check whether `code` is something `encode` could have produced
pub fn is_valid(code: &str) -> bool {
    extract_digits(code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLEPLEX: Coordinate = Coordinate::new(37.4219983, -122.0840000);

    #[test]
    fn test_known_code() {
        let code = encode(GOOGLEPLEX, 8).unwrap();
        assert_eq!(code.as_str(), "849VCWC8+");
        assert_eq!(code.code_length(), 8);

        let full = encode(GOOGLEPLEX, 10).unwrap();
        assert_eq!(full.as_str(), "849VCWC8+QC");
    }

    #[test]
    fn test_known_code_decodes_near_input() {
        let area = decode("849VCWC8+").unwrap();
        assert!(area.contains(&GOOGLEPLEX));
        assert_eq!(area.code_length, 8);

        let center = area.center();
        assert!((center.latitude - GOOGLEPLEX.latitude).abs() <= area.lat_span());
        assert!((center.longitude - GOOGLEPLEX.longitude).abs() <= area.lon_span());
        assert!((area.lat_span() - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_short_codes_are_padded() {
        let code = encode(GOOGLEPLEX, 4).unwrap();
        assert_eq!(code.as_str(), "849V0000+");

        let area = decode(code.as_str()).unwrap();
        assert_eq!(area.code_length, 4);
        assert!((area.lat_span() - 1.0).abs() < 1e-12);
        assert!(area.contains(&GOOGLEPLEX));
    }

    #[test]
    fn test_round_trip_recovers_cell() {
        let samples = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(-89.99, -179.99),
            Coordinate::new(64.1466, -21.9426),
        ];

        for coordinate in samples {
            for length in [2, 4, 6, 8, 10] {
                let code = encode(coordinate, length).unwrap();
                let area = decode(code.as_str()).unwrap();
                assert!(area.contains(&coordinate), "{:?} not in {}", coordinate, code);
                assert_eq!(encode(area.center(), length).unwrap(), code);
            }
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode(GOOGLEPLEX, 8).unwrap(), encode(GOOGLEPLEX, 8).unwrap());
    }

    #[test]
    fn test_cell_edge_belongs_to_upper_cell() {
        // 1.0 sits exactly on a one-degree edge
        let area = decode(encode(Coordinate::new(1.0, 1.0), 4).unwrap().as_str()).unwrap();
        assert!((area.lat_lo - 1.0).abs() < 1e-12);
        assert!((area.lon_lo - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_just_below_edge_stays_in_lower_cell() {
        let coordinate = Coordinate::new(37.42499999, -122.084);
        let code = encode(coordinate, 8).unwrap();
        let area = decode(code.as_str()).unwrap();
        assert!(area.contains(&coordinate), "{:?} not in {:?}", coordinate, area);
        assert!((area.lat_hi - 37.425).abs() < 1e-9);

        let area = decode(encode(Coordinate::new(0.99999999, 0.99999999), 4).unwrap().as_str())
            .unwrap();
        assert!((area.lat_lo - 0.0).abs() < 1e-12);
        assert!((area.lon_lo - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_neighbourhood_sweep() {
        let samples = [
            GOOGLEPLEX,
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(64.1466, -21.9426),
        ];

        for sample in samples {
            for length in [2, 4, 6, 8, 10] {
                let cell = decode(encode(sample, length).unwrap().as_str()).unwrap();
                let center = cell.center();

                let mut points = Vec::new();
                for offset in [-1e-8, 0.0, 1e-8] {
                    points.push(Coordinate::new(cell.lat_lo + offset, center.longitude));
                    points.push(Coordinate::new(cell.lat_hi + offset, center.longitude));
                    points.push(Coordinate::new(center.latitude, cell.lon_lo + offset));
                    points.push(Coordinate::new(center.latitude, cell.lon_hi + offset));
                }

                for coordinate in points {
                    let code = encode(coordinate, length).unwrap();
                    let area = decode(code.as_str()).unwrap();
                    assert!(area.contains(&coordinate), "{:?} not in {}", coordinate, code);
                    assert_eq!(encode(area.center(), length).unwrap(), code);
                }
            }
        }
    }

    #[test]
    fn test_pole_and_antimeridian_clamping() {
        let north = decode(encode(Coordinate::new(90.0, 0.0), 8).unwrap().as_str()).unwrap();
        assert!((north.lat_hi - 90.0).abs() < 1e-12);
        assert!(north.lat_lo < north.lat_hi);

        let east = encode(Coordinate::new(0.0, 180.0), 8).unwrap();
        let west = encode(Coordinate::new(0.0, -180.0), 8).unwrap();
        assert_eq!(east, west);
    }

    #[test]
    fn test_invalid_input() {
        for length in [0, 1, 3, 9, 12] {
            assert!(matches!(
                encode(GOOGLEPLEX, length),
                Err(CodecError::InvalidInput { .. })
            ));
        }
        assert!(matches!(
            encode(Coordinate::new(91.0, 0.0), 8),
            Err(CodecError::InvalidInput { .. })
        ));
        assert!(matches!(
            encode(Coordinate::new(0.0, f64::INFINITY), 8),
            Err(CodecError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_malformed_codes() {
        let bad = [
            "849VCWC8",     // no separator
            "849VCW+C8",    // separator misplaced
            "849VCWC8++",   // two separators
            "849VCWCA+",    // A is not in the alphabet
            "849V00C8+",    // digits after padding
            "8490000+",     // separator too early
            "8400000+0",    // wrong head length
            "84000000+RM",  // padded code with tail digits
            "849VCWC8+R",   // single tail digit
            "X49VCWC8+",    // latitude digit too large
            "8X9VCWC8+",    // longitude digit too large
            "00000000+",    // no digits
            "\u{132}49VCWC8+", // non-ASCII, low byte is '2'
        ];

        for code in bad {
            assert!(
                matches!(decode(code), Err(CodecError::MalformedCode { .. })),
                "{} should be rejected",
                code
            );
            assert!(!is_valid(code));
            assert!(code.parse::<GridCode>().is_err());
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("849vcwc8+").unwrap(), decode("849VCWC8+").unwrap());
        let code: GridCode = "849vcwc8+".parse().unwrap();
        assert_eq!(code.as_str(), "849VCWC8+");
    }

    #[test]
    fn test_corners_form_ring() {
        let area = decode("849VCWC8+").unwrap();
        let corners = area.corners();
        assert_eq!(corners[0], Coordinate::new(area.lat_lo, area.lon_lo));
        assert_eq!(corners[2], Coordinate::new(area.lat_hi, area.lon_hi));

        let polygon = area.to_polygon();
        assert_eq!(polygon.vertices().len(), 4);
        let centroid = polygon.centroid().unwrap();
        assert!((centroid.latitude - area.center().latitude).abs() < 1e-9);
    }

    #[test]
    fn test_grid_code_serde() {
        let code = encode(GOOGLEPLEX, 8).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"849VCWC8+\"");
        let back: GridCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<GridCode>("\"not a code\"").is_err());
    }
}
