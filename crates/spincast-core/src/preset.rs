// Classic 75-ball preset: five lettered bands of fifteen numbers.

/// Band letters in calling order.
pub const PRESET_LETTERS: [char; 5] = ['B', 'I', 'N', 'G', 'O'];

/// Numbers per band.
pub const BAND_SIZE: u32 = 15;

/// All 75 labels, `B1..B15, I16..I30, N31..N45, G46..G60, O61..O75`.
pub fn classic_preset() -> Vec<String> {
    PRESET_LETTERS
        .iter()
        .enumerate()
        .flat_map(|(band, letter)| {
            let start = band as u32 * BAND_SIZE + 1;
            (start..start + BAND_SIZE).map(move |n| format!("{letter}{n}"))
        })
        .collect()
}

/// The preset as newline-delimited raw text, the form the pool is applied from.
pub fn classic_preset_text() -> String {
    classic_preset().join("\n")
}
