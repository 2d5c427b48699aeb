/// Default upscaling factor when none is requested.
pub const DEFAULT_SCALE: u32 = 2;

/// Model file looked up in the working directory when neither an explicit
/// path nor a name hint is given.
pub const DEFAULT_MODEL_NAME: &str = "EDSR_x2.onnx";

/// Minimum pixel count (h*w) to resample channels in parallel with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in a color plane (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Index of the alpha channel in an RGBA image.
pub const ALPHA_CHANNEL_INDEX: usize = 3;

/// Scales EDSR models are published for.
pub const EDSR_SCALES: [u32; 3] = [2, 3, 4];

/// Scales FSRCNN models are published for.
pub const FSRCNN_SCALES: [u32; 3] = [2, 3, 4];

/// Scales LapSRN models are published for.
pub const LAPSRN_SCALES: [u32; 3] = [2, 4, 8];

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Offset applied to the Cb/Cr planes of 8-bit full-range YCbCr.
pub const CHROMA_OFFSET: f32 = 128.0;
