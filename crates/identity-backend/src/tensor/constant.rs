/// # Constants with reserved meanings in the identity model

/// Substring of an input tensor name that is rewritten to produce its output name
pub const INPUT_TOKEN: &str = "input";

/// Replacement for [`INPUT_TOKEN`] in output tensor names
pub const OUTPUT_TOKEN: &str = "output";

/// Name of the string output carrying the echoed request parameters
pub const OUTPUT_PARAMETERS: &str = "output_parameters";

/// Dimension size meaning "any size" in a declared tensor shape
pub const DYNAMIC_DIM: i64 = -1;

/// Declared and actual shape of the [`OUTPUT_PARAMETERS`] tensor
pub const OUTPUT_PARAMETERS_DIMS: [i64; 1] = [1];

/// Byte width of the length prefix in front of each BYTES element
pub(crate) const BYTES_LENGTH_PREFIX: usize = 4;
