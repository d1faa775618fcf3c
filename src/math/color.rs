/// Converts a `0xRRGGBB` value to float RGB in `[0, 1]`
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}
