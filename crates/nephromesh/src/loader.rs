//! NIfTI-1 volume loading.
//!
//! Single-file images (`.nii`, optionally gzip-compressed) in either byte
//! order are supported. Voxels are read as integer labels; the qform/sform
//! orientation is ignored and voxel `(i, j, k)` lands at `(i, j, k) * pixdim`.

use std::io::Read;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use flate2::read::GzDecoder;
use glam::{UVec3, Vec3};
use nephromesh_core::{LoadError, ScalarVolume};

const HEADER_SIZE: usize = 348;
/// Header plus the 4-byte extension flag.
const MIN_VOX_OFFSET: usize = 352;
const MAGIC_SINGLE_FILE: [u8; 4] = *b"n+1\0";
const MAGIC_PAIR: [u8; 4] = *b"ni1\0";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// On-disk NIfTI-1 header layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[allow(dead_code)]
struct Nifti1Header {
    sizeof_hdr: i32,
    data_type: [u8; 10],
    db_name: [u8; 18],
    extents: i32,
    session_error: i16,
    regular: u8,
    dim_info: u8,
    dim: [i16; 8],
    intent_p: [f32; 3],
    intent_code: i16,
    datatype: i16,
    bitpix: i16,
    slice_start: i16,
    pixdim: [f32; 8],
    vox_offset: f32,
    scl_slope: f32,
    scl_inter: f32,
    slice_end: i16,
    slice_code: u8,
    xyzt_units: u8,
    cal_max: f32,
    cal_min: f32,
    slice_duration: f32,
    toffset: f32,
    glmax: i32,
    glmin: i32,
    descrip: [u8; 80],
    aux_file: [u8; 24],
    qform_code: i16,
    sform_code: i16,
    quatern: [f32; 3],
    qoffset: [f32; 3],
    srow_x: [f32; 4],
    srow_y: [f32; 4],
    srow_z: [f32; 4],
    intent_name: [u8; 16],
    magic: [u8; 4],
}

impl Nifti1Header {
    /// Swaps the byte order of every field the loader reads.
    fn byte_swapped(mut self) -> Self {
        self.sizeof_hdr = self.sizeof_hdr.swap_bytes();
        self.dim = self.dim.map(i16::swap_bytes);
        self.datatype = self.datatype.swap_bytes();
        self.bitpix = self.bitpix.swap_bytes();
        self.pixdim = self.pixdim.map(swap_f32);
        self.vox_offset = swap_f32(self.vox_offset);
        self.scl_slope = swap_f32(self.scl_slope);
        self.scl_inter = swap_f32(self.scl_inter);
        self
    }
}

fn swap_f32(v: f32) -> f32 {
    f32::from_bits(v.to_bits().swap_bytes())
}

/// NIfTI voxel datatype codes we decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Datatype {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl Datatype {
    fn from_code(code: i16) -> Option<Self> {
        Some(match code {
            2 => Self::U8,
            256 => Self::I8,
            512 => Self::U16,
            4 => Self::I16,
            768 => Self::U32,
            8 => Self::I32,
            1280 => Self::U64,
            1024 => Self::I64,
            16 => Self::F32,
            64 => Self::F64,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Loads a labeled volume from a NIfTI-1 file.
pub fn load_volume(path: impl AsRef<Path>) -> Result<ScalarVolume, LoadError> {
    let path = path.as_ref();
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let raw = std::fs::read(path).map_err(io_err)?;
    let bytes = if raw.starts_with(&GZIP_MAGIC) {
        let mut decompressed = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(io_err)?;
        decompressed
    } else {
        raw
    };

    let volume = parse_nifti(&bytes, path)?;
    log::info!(
        "loaded {} ({} voxels, spacing {})",
        path.display(),
        volume.dims(),
        volume.spacing()
    );
    Ok(volume)
}

/// Parses an uncompressed NIfTI-1 image held in memory. `path` is only used
/// in error messages.
pub fn parse_nifti(bytes: &[u8], path: &Path) -> Result<ScalarVolume, LoadError> {
    let invalid = |reason: String| LoadError::InvalidFormat {
        path: path.to_path_buf(),
        reason,
    };
    let truncated = |expected: usize| LoadError::Truncated {
        path: path.to_path_buf(),
        expected,
        actual: bytes.len(),
    };

    if bytes.len() < HEADER_SIZE {
        return Err(truncated(HEADER_SIZE));
    }
    let header: Nifti1Header = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    let (header, native) = if header.sizeof_hdr == HEADER_SIZE as i32 {
        (header, true)
    } else if header.sizeof_hdr.swap_bytes() == HEADER_SIZE as i32 {
        (header.byte_swapped(), false)
    } else {
        return Err(invalid(format!(
            "header size field is {}, expected {HEADER_SIZE}",
            header.sizeof_hdr
        )));
    };

    if header.magic == MAGIC_PAIR {
        return Err(invalid("separate .hdr/.img pairs are not supported".into()));
    }
    if header.magic != MAGIC_SINGLE_FILE {
        return Err(invalid(format!("bad magic {:?}", header.magic)));
    }

    let datatype =
        Datatype::from_code(header.datatype).ok_or_else(|| LoadError::UnsupportedDatatype {
            path: path.to_path_buf(),
            code: header.datatype,
        })?;

    let dims = volume_dims(&header.dim).map_err(invalid)?;
    let spacing = Vec3::from_slice(&header.pixdim[1..4])
        .to_array()
        .map(|s| if s.is_finite() && s > 0.0 { s } else { 1.0 });
    let spacing = Vec3::from_array(spacing);

    let offset = if header.vox_offset.is_finite() && header.vox_offset >= MIN_VOX_OFFSET as f32 {
        header.vox_offset as usize
    } else {
        MIN_VOX_OFFSET
    };
    if offset > bytes.len() {
        return Err(invalid(format!(
            "voxel offset {offset} is past the end of the file ({} bytes)",
            bytes.len()
        )));
    }
    let end = [dims.x, dims.y, dims.z]
        .into_iter()
        .try_fold(datatype.size(), |acc, n| acc.checked_mul(n as usize))
        .and_then(|len| offset.checked_add(len))
        .ok_or_else(|| invalid(format!("voxel data size overflows for dims {dims}")))?;
    if bytes.len() < end {
        return Err(truncated(end));
    }

    let scaling = match (header.scl_slope, header.scl_inter) {
        (slope, _) if slope == 0.0 || !slope.is_finite() => None,
        (slope, inter) if slope == 1.0 && inter == 0.0 => None,
        (slope, inter) => Some((f64::from(slope), f64::from(inter))),
    };

    let data = decode_voxels(&bytes[offset..end], datatype, native, scaling);
    ScalarVolume::new(dims, spacing, data).map_err(|e| invalid(e.to_string()))
}

/// Reads the spatial extent from `dim`, taking the first 3D frame of 4D+ images.
fn volume_dims(dim: &[i16; 8]) -> Result<UVec3, String> {
    let ndim = dim[0];
    if !(1..=7).contains(&ndim) {
        return Err(format!("dim[0] is {ndim}, expected 1..=7"));
    }
    let mut dims = [1_u32; 3];
    for (axis, size) in dims.iter_mut().enumerate() {
        if axis < ndim as usize {
            let n = dim[axis + 1];
            if n <= 0 {
                return Err(format!("dim[{}] is {n}", axis + 1));
            }
            *size = n as u32;
        }
    }
    Ok(UVec3::from_array(dims))
}

/// Splits `raw` into `N`-byte words in host order.
fn words<const N: usize>(raw: &[u8], native: bool) -> impl Iterator<Item = [u8; N]> + '_ {
    raw.chunks_exact(N).map(move |c| {
        let mut word = [0_u8; N];
        word.copy_from_slice(c);
        if !native {
            word.reverse();
        }
        word
    })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
fn decode_voxels(
    raw: &[u8],
    datatype: Datatype,
    native: bool,
    scaling: Option<(f64, f64)>,
) -> Vec<i32> {
    let values: Vec<f64> = match datatype {
        Datatype::U8 => raw.iter().map(|&b| f64::from(b)).collect(),
        Datatype::I8 => raw.iter().map(|&b| f64::from(b as i8)).collect(),
        Datatype::U16 => words::<2>(raw, native).map(|w| f64::from(u16::from_ne_bytes(w))).collect(),
        Datatype::I16 => words::<2>(raw, native).map(|w| f64::from(i16::from_ne_bytes(w))).collect(),
        Datatype::U32 => words::<4>(raw, native).map(|w| f64::from(u32::from_ne_bytes(w))).collect(),
        Datatype::I32 => words::<4>(raw, native).map(|w| f64::from(i32::from_ne_bytes(w))).collect(),
        Datatype::U64 => words::<8>(raw, native).map(|w| u64::from_ne_bytes(w) as f64).collect(),
        Datatype::I64 => words::<8>(raw, native).map(|w| i64::from_ne_bytes(w) as f64).collect(),
        Datatype::F32 => words::<4>(raw, native).map(|w| f64::from(f32::from_ne_bytes(w))).collect(),
        Datatype::F64 => words::<8>(raw, native).map(f64::from_ne_bytes).collect(),
    };

    let round = datatype.is_float() || scaling.is_some();
    values
        .into_iter()
        .map(|v| {
            let v = scaling.map_or(v, |(slope, inter)| v * slope + inter);
            if round {
                v.round() as i32
            } else {
                v as i32
            }
        })
        .collect()
}

/// Encodes a volume as an uncompressed little-endian NIfTI-1 image with
/// `int32` voxels.
///
/// NIfTI-1 stores each dimension as an `i16`, so volumes longer than
/// 32767 voxels along any axis are rejected with `InvalidInput`.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn encode_nifti(volume: &ScalarVolume) -> std::io::Result<Vec<u8>> {
    let dims = volume.dims();
    let spacing = volume.spacing();
    let [nx, ny, nz] = dims.to_array().map(i16::try_from);
    let (Ok(nx), Ok(ny), Ok(nz)) = (nx, ny, nz) else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("volume dims {dims} exceed the NIfTI-1 limit of {}", i16::MAX),
        ));
    };

    let mut header = Nifti1Header::zeroed();
    header.sizeof_hdr = HEADER_SIZE as i32;
    header.dim = [3, nx, ny, nz, 1, 1, 1, 1];
    header.datatype = 8;
    header.bitpix = 32;
    header.pixdim = [1.0, spacing.x, spacing.y, spacing.z, 1.0, 1.0, 1.0, 1.0];
    header.vox_offset = MIN_VOX_OFFSET as f32;
    header.scl_slope = 1.0;
    header.magic = MAGIC_SINGLE_FILE;

    if cfg!(target_endian = "big") {
        header = header.byte_swapped();
    }

    let mut bytes = Vec::with_capacity(MIN_VOX_OFFSET + volume.num_voxels() * 4);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    // No extensions.
    bytes.extend_from_slice(&[0; 4]);
    for &v in volume.data() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    Ok(bytes)
}

/// Writes a volume to `path` with [`encode_nifti`].
pub fn save_volume(volume: &ScalarVolume, path: impl AsRef<Path>) -> std::io::Result<()> {
    std::fs::write(path, encode_nifti(volume)?)
}
