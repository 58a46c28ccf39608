#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // PPM 2x2
    let ppm = b"P6\n2 2\n255\n\xff\x00\x00\x00\xff\x00\x00\x00\xff\x80\x80\x80";
    fs::write(format!("{dir}/ppm_2x2.ppm"), ppm).unwrap();

    // PGM 3x2
    let pgm = b"P5\n3 2\n255\n\x00\x40\x80\xc0\xff\x64";
    fs::write(format!("{dir}/pgm_3x2.pgm"), pgm).unwrap();

    // PGM 5x1, 2-bit and 4-bit
    fs::write(format!("{dir}/pgm2_5x1.pgm"), b"P5 5 1 3\n\x00\x01\x02\x03\x01").unwrap();
    fs::write(format!("{dir}/pgm4_3x1.pgm"), b"P5 3 1 15\n\x0f\x07\x00").unwrap();

    // PGM 12-bit with comments
    let pgm12 = b"P5\n# twelve bits\n2 1\n4095\n\x0f\xff\x00\x01";
    fs::write(format!("{dir}/pgm12_2x1.pgm"), pgm12).unwrap();

    // PPM 16-bit 1x1
    fs::write(format!("{dir}/ppm16_1x1.ppm"), b"P6 1 1 65535\n\x12\x34\x56\x78\x9a\xbc").unwrap();

    // PBM 9x2
    fs::write(format!("{dir}/pbm_9x2.pbm"), b"P4\n9 2\n\xaa\x80\x55\x00").unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_p6.bin"), b"P6").unwrap();
    fs::write(format!("{dir}/long_token.bin"), b"P5 123456789012 1 255\n").unwrap();
    fs::write(format!("{dir}/short_payload.bin"), b"P5 4 4 255\n\x00\x00").unwrap();

    println!("Generated seed corpus in {dir}/");
}
