//! Embedded cue data.
//!
//! The two built-in cue identifiers (`default1`, `default2`) resolve to
//! audio data compiled into the binary, so a fresh install always has a
//! working phase-transition sound without any external files.
//!
//! Note: In a production build, these would contain actual audio data.
//! For now, we provide minimal valid WAV documents for testing.

/// First built-in cue (minimal WAV format for testing).
///
/// WAV format structure:
/// - RIFF header (12 bytes)
/// - fmt chunk (24 bytes)
/// - data chunk header (8 bytes)
/// - audio data (variable)
pub const DEFAULT1_SOUND_DATA: &[u8] = &[
    // RIFF header
    0x52, 0x49, 0x46, 0x46, // "RIFF"
    0x24, 0x00, 0x00, 0x00, // File size - 8 (36 bytes)
    0x57, 0x41, 0x56, 0x45, // "WAVE"
    // fmt chunk
    0x66, 0x6D, 0x74, 0x20, // "fmt "
    0x10, 0x00, 0x00, 0x00, // Chunk size (16 bytes)
    0x01, 0x00, // Audio format (1 = PCM)
    0x01, 0x00, // Number of channels (1 = mono)
    0x44, 0xAC, 0x00, 0x00, // Sample rate (44100 Hz)
    0x88, 0x58, 0x01, 0x00, // Byte rate (44100 * 1 * 2 = 88200)
    0x02, 0x00, // Block align (1 * 2 = 2)
    0x10, 0x00, // Bits per sample (16)
    // data chunk header
    0x64, 0x61, 0x74, 0x61, // "data"
    0x00, 0x00, 0x00, 0x00, // Data size (0 bytes - silent)
];

/// Second built-in cue (same placeholder format at a lower sample rate).
pub const DEFAULT2_SOUND_DATA: &[u8] = &[
    // RIFF header
    0x52, 0x49, 0x46, 0x46, // "RIFF"
    0x24, 0x00, 0x00, 0x00, // File size - 8 (36 bytes)
    0x57, 0x41, 0x56, 0x45, // "WAVE"
    // fmt chunk
    0x66, 0x6D, 0x74, 0x20, // "fmt "
    0x10, 0x00, 0x00, 0x00, // Chunk size (16 bytes)
    0x01, 0x00, // Audio format (1 = PCM)
    0x01, 0x00, // Number of channels (1 = mono)
    0x22, 0x56, 0x00, 0x00, // Sample rate (22050 Hz)
    0x44, 0xAC, 0x00, 0x00, // Byte rate (22050 * 1 * 2 = 44100)
    0x02, 0x00, // Block align (1 * 2 = 2)
    0x10, 0x00, // Bits per sample (16)
    // data chunk header
    0x64, 0x61, 0x74, 0x61, // "data"
    0x00, 0x00, 0x00, 0x00, // Data size (0 bytes - silent)
];

/// Returns the embedded data for a built-in cue identifier, or `None` if
/// the identifier is not a built-in.
#[must_use]
pub fn get_builtin_sound(name: &str) -> Option<&'static [u8]> {
    match name {
        "default1" => Some(DEFAULT1_SOUND_DATA),
        "default2" => Some(DEFAULT2_SOUND_DATA),
        _ => None,
    }
}

/// Returns the format description of the embedded cues.
#[must_use]
pub const fn get_embedded_sound_format() -> &'static str {
    "WAV (16-bit PCM, Mono)"
}
