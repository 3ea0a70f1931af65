use super::*;

#[test]
fn f32le_bytes_round_to_samples() {
    let mut bytes = Vec::new();
    for v in [0.25f32, -1.0, 0.0] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(pcm_from_f32le(&bytes).unwrap(), vec![0.25, -1.0, 0.0]);
}

#[test]
fn misaligned_bytes_are_a_decode_error() {
    assert!(matches!(
        pcm_from_f32le(&[0, 0, 0]),
        Err(HerodoError::Decode(_))
    ));
}

#[test]
fn missing_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FfmpegAudioDecoder::default()
        .decode(&dir.path().join("nope.mp3"), 48_000, 2)
        .unwrap_err();
    assert!(matches!(err, HerodoError::Decode(_)));
}

#[test]
fn missing_program_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    std::fs::write(&path, b"x").unwrap();
    let err = FfmpegAudioDecoder::new("herodo-no-such-ffmpeg")
        .decode(&path, 48_000, 2)
        .unwrap_err();
    assert!(err.to_string().contains("failed to run ffmpeg"));
}
