#![no_main]
use libfuzzer_sys::fuzz_target;
use nbt_schematic::{decode_nbt, decode_with, Compression, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    if let Ok(map) = decode_nbt(data) {
        // Every decoded map answers every in-bounds query from its buffers
        for (x, y, z, m) in map.filled() {
            assert_eq!(map.material_at(x as i32, y as i32, z as i32), m);
        }
    }
    let opts = DecodeOptions::default()
        .with_compression(Compression::Auto)
        .with_max_size(1 << 24);
    let _ = decode_with(data, &opts);
});
