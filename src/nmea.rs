//! NMEA-0183 sentence classification and field extraction.
//!
//! Only the three sentences the chime needs are decoded. Checksums are not
//! validated, and numeric fields that fail to parse read as zero.

use tinyvec::ArrayVec;

use crate::config::KMH_PER_KNOT;

const MAX_FIELDS: usize = 32;
const MAX_VIEWS: usize = 8;
const MAX_LOCKED: usize = 12;

const GSV_FIRST_GROUP: usize = 4;
const GSV_GROUP_LEN: usize = 4;
const GSV_SNR_OFFSET: usize = 3;

const GSA_FIRST_ID: usize = 3;
const GSA_LAST_ID: usize = 14;

const RMC_STATUS: usize = 2;
const RMC_SPEED: usize = 7;

#[inline]
pub fn knots_to_kmh(knots: f32) -> f32 {
    knots * KMH_PER_KNOT
}

/// Two-letter source identifier, e.g. `GP` (GPS) or `GN` (multi-GNSS).
pub type Talker = [u8; 2];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rmc {
    /// Status field reads `A`.
    pub active: bool,
    /// Ground speed, or `None` when the sentence carries no speed.
    pub speed_kmh: Option<f32>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SatelliteView {
    pub id: u16,
    pub snr: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gsv {
    pub talker: Talker,
    pub views: ArrayVec<[SatelliteView; MAX_VIEWS]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gsa {
    pub talker: Talker,
    pub locked: ArrayVec<[u16; MAX_LOCKED]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    Rmc { talker: Talker, rmc: Rmc },
    Gsv(Gsv),
    Gsa(Gsa),
    Other,
}

impl Sentence {
    pub fn parse(raw: &[u8]) -> Self {
        let fields = split_fields(raw);
        let header = field(&fields, 0);
        if header.len() < 6 || header[0] != b'$' {
            return Sentence::Other;
        }
        let talker = [header[1], header[2]];
        match &header[3..6] {
            b"RMC" => Sentence::Rmc {
                talker,
                rmc: parse_rmc(&fields),
            },
            b"GSV" => Sentence::Gsv(parse_gsv(talker, &fields)),
            b"GSA" => Sentence::Gsa(parse_gsa(talker, &fields)),
            _ => Sentence::Other,
        }
    }
}

type Fields<'a> = ArrayVec<[&'a [u8]; MAX_FIELDS]>;

// Strips the `*hh` checksum and line ending, then splits on commas keeping
// empty fields. Fields past MAX_FIELDS are dropped. Works on raw bytes so a
// corrupted byte only spoils the field it lands in.
fn split_fields(raw: &[u8]) -> Fields<'_> {
    let body = raw.split(|&b| b == b'*').next().unwrap_or_default();
    let end = body
        .iter()
        .rposition(|&b| b != b'\r' && b != b'\n')
        .map_or(0, |i| i + 1);
    let mut fields = Fields::new();
    for field in body[..end].split(|&b| b == b',') {
        if fields.try_push(field).is_some() {
            break;
        }
    }
    fields
}

fn field<'a>(fields: &Fields<'a>, index: usize) -> &'a [u8] {
    fields.get(index).copied().unwrap_or_default()
}

fn number<T: core::str::FromStr + Default>(field: &[u8]) -> T {
    core::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

fn parse_rmc(fields: &Fields) -> Rmc {
    let speed = field(fields, RMC_SPEED);
    if fields.len() <= RMC_SPEED || speed.is_empty() {
        return Rmc {
            active: false,
            speed_kmh: None,
        };
    }
    Rmc {
        active: field(fields, RMC_STATUS).starts_with(b"A"),
        speed_kmh: Some(knots_to_kmh(number(speed))),
    }
}

fn parse_gsv(talker: Talker, fields: &Fields) -> Gsv {
    let mut views = ArrayVec::new();
    let mut i = GSV_FIRST_GROUP;
    while i + GSV_SNR_OFFSET < fields.len() {
        let id = fields[i];
        if !id.is_empty() {
            let view = SatelliteView {
                id: number(id),
                snr: number(fields[i + GSV_SNR_OFFSET]),
            };
            if views.try_push(view).is_some() {
                break;
            }
        }
        i += GSV_GROUP_LEN;
    }
    Gsv { talker, views }
}

fn parse_gsa(talker: Talker, fields: &Fields) -> Gsa {
    let mut locked = ArrayVec::new();
    for &id in fields
        .iter()
        .take(GSA_LAST_ID + 1)
        .skip(GSA_FIRST_ID)
        .filter(|id| !id.is_empty())
    {
        locked.push(number(id));
    }
    Gsa { talker, locked }
}
