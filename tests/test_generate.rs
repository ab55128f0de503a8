
use dcp::classify::MXF_HEADER;
use dcp::{AssetType, ContentKind, Dcp, DcpError, DcpParser, ErrorKind, Format, ParserSettings};
use fixtures::*;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_generates_freedcp_package() {
    ensure_env_logger_initialized();
    let dir = freedcp_package();

    let dcp = Dcp::generate(dir.path()).unwrap();

    assert_eq!(dcp.format(), Format::Interop);
    assert_eq!(dcp.root_dir(), dir.path());
    assert_eq!(dcp.asset_map.id, FREEDCP_ASSETMAP_ID);
    assert_eq!(
        dcp.asset_map.size(),
        1288 + 1550 + 3_906_847_916 + 879_052_345
    );

    assert_eq!(dcp.cpls.len(), 1);
    assert_eq!(dcp.cpls[0].annotation_text, FREEDCP_TITLE);
    assert_eq!(dcp.cpls[0].content_kind, ContentKind::Test);

    assert_eq!(dcp.pkls.len(), 1);
    assert_eq!(dcp.pkls[0].assets.len(), 3);
    assert_eq!(dcp.pkls[0].assets[0].asset_type, AssetType::MxfPicture);

    assert_eq!(
        dcp.files(),
        [
            "ASSETMAP",
            FREEDCP_PKL,
            FREEDCP_CPL,
            FREEDCP_VIDEO,
            FREEDCP_AUDIO
        ]
    );
}

#[test]
fn test_records_both_classifications() {
    let dir = freedcp_package();
    let dcp = Dcp::generate(dir.path()).unwrap();

    let types: Vec<_> = dcp
        .files_with_types()
        .iter()
        .map(|file| (file.path.as_str(), file.guessed, file.detected))
        .collect();

    assert_eq!(
        types,
        [
            (FREEDCP_PKL, AssetType::Pkl, AssetType::Pkl),
            (FREEDCP_CPL, AssetType::Cpl, AssetType::Cpl),
            (FREEDCP_VIDEO, AssetType::Mxf, AssetType::Mxf),
            (FREEDCP_AUDIO, AssetType::Mxf, AssetType::Mxf),
        ]
    );
}

#[test]
fn test_text_rendering() {
    let dir = freedcp_package();
    let dcp = Dcp::generate(dir.path()).unwrap();

    insta::assert_snapshot!(dcp.to_string(), @r"
    Type: Interop
    AssetMap: urn:uuid:88ef5d99-e2aa-483e-9697-943e18b77cea
    CPL: Bewegte Bilder - Tricks17 - Test Film - Full Content - 5.1 - JPEG2000
    PKL: Bewegte Bilder - Tricks17 - Test Film - Full Content - 5.1 - JPEG2000
    ");
}

#[test]
fn test_missing_asset_map() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("some_cpl.xml"), cpl_xml("orphan")).unwrap();

    let err = Dcp::generate(dir.path()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, DcpError::AssetMapNotFound { .. }));
}

#[test]
fn test_size_mismatch_fails() {
    let dir = freedcp_package();
    // One byte short of the declared 879052345.
    write_mxf(dir.path().join(FREEDCP_AUDIO), 879_052_344);

    let err = Dcp::generate(dir.path()).unwrap_err();

    match err {
        DcpError::SizeMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, dir.path().join(FREEDCP_AUDIO));
            assert_eq!(expected, 879_052_345);
            assert_eq!(found, 879_052_344);
        }
        other => panic!("expected a size mismatch, got {other:?}"),
    }
}

#[test]
fn test_every_chunk_is_size_checked() {
    ensure_env_logger_initialized();
    let dir = tempfile::tempdir().unwrap();
    write_mxf(dir.path().join("reel_1.mxf"), 4096);
    write_mxf(dir.path().join("reel_2.mxf"), 2047);

    let asset = "<Asset><Id>urn:uuid:00000000</Id><ChunkList>\
         <Chunk><Path>reel_1.mxf</Path><VolumeIndex>1</VolumeIndex><Offset>0</Offset><Length>4096</Length></Chunk>\
         <Chunk><Path>reel_2.mxf</Path><VolumeIndex>1</VolumeIndex><Offset>4096</Offset><Length>2048</Length></Chunk>\
         </ChunkList></Asset>";
    write_asset_map(dir.path(), "ASSETMAP.xml", asset);

    match Dcp::generate(dir.path()).unwrap_err() {
        DcpError::SizeMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, dir.path().join("reel_2.mxf"));
            assert_eq!(expected, 2048);
            assert_eq!(found, 2047);
        }
        other => panic!("expected a size mismatch, got {other:?}"),
    }

    write_mxf(dir.path().join("reel_2.mxf"), 2048);
    let dcp = Dcp::generate(dir.path()).unwrap();

    assert_eq!(dcp.asset_map.size(), 6144);
    assert_eq!(dcp.files(), ["ASSETMAP.xml", "reel_1.mxf", "reel_2.mxf"]);
    assert!(
        dcp.files_with_types()
            .iter()
            .all(|file| file.detected == AssetType::Mxf && file.guessed == AssetType::Mxf)
    );
}

#[test]
fn test_size_check_can_be_disabled() {
    let dir = freedcp_package();
    write_mxf(dir.path().join(FREEDCP_AUDIO), 1024);

    let dcp = DcpParser::from_path(dir.path())
        .with_configuration(ParserSettings::new().validate_sizes(false))
        .parse()
        .unwrap();

    assert_eq!(dcp.cpls.len(), 1);
    assert_eq!(dcp.pkls.len(), 1);
}

#[test]
fn test_missing_referenced_file_fails() {
    let dir = freedcp_package();
    fs::remove_file(dir.path().join(FREEDCP_VIDEO)).unwrap();

    // Even with size checks off, every file must exist.
    let err = DcpParser::from_path(dir.path())
        .with_configuration(ParserSettings::new().validate_sizes(false))
        .parse()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, DcpError::FileNotFound { path } if path == dir.path().join(FREEDCP_VIDEO)));
}

#[test]
fn test_documents_can_be_left_unparsed() {
    let dir = freedcp_package();

    let dcp = DcpParser::from_path(dir.path())
        .with_configuration(ParserSettings::new().parse_documents(false))
        .parse()
        .unwrap();

    assert!(dcp.cpls.is_empty());
    assert!(dcp.pkls.is_empty());
    assert_eq!(dcp.files_with_types()[1].detected, AssetType::Cpl);
}

#[test]
fn test_header_overrides_file_name() {
    let mut mxf = MXF_HEADER.to_vec();
    mxf.extend_from_slice(&[0u8; 200]);

    let pkl = pkl_xml("Disguised packing list");
    let cpl = cpl_xml("Real composition");

    let dir = package_with(&[
        ("essence.bin", mxf.as_slice()),
        ("looks_like_a_cpl.xml", pkl.as_bytes()),
        ("real_cpl.xml", cpl.as_bytes()),
        ("notes.txt", b"nothing to see here".as_slice()),
    ]);

    let dcp = Dcp::generate(dir.path()).unwrap();

    let types: Vec<_> = dcp
        .files_with_types()
        .iter()
        .map(|file| (file.guessed, file.detected))
        .collect();
    assert_eq!(
        types,
        [
            (AssetType::Unknown, AssetType::Mxf),
            (AssetType::Cpl, AssetType::Pkl),
            (AssetType::Cpl, AssetType::Cpl),
            (AssetType::Unknown, AssetType::Unknown),
        ]
    );

    assert_eq!(dcp.format(), Format::Interop);
    assert_eq!(dcp.asset_map_file(), "ASSETMAP.xml");
    assert_eq!(dcp.pkls.len(), 1);
    assert_eq!(dcp.pkls[0].annotation_text, "Disguised packing list");
    assert_eq!(dcp.cpls.len(), 1);
    assert_eq!(dcp.cpls[0].format, Format::Smpte);
}

#[test]
fn test_short_files_are_not_mxf() {
    let dir = package_with(&[("truncated.mxf", &MXF_HEADER[..20])]);

    let dcp = Dcp::generate(dir.path()).unwrap();

    assert_eq!(dcp.files_with_types()[0].guessed, AssetType::Mxf);
    assert_eq!(dcp.files_with_types()[0].detected, AssetType::Unknown);
}

#[test]
fn test_malformed_cpl_aborts() {
    let good = pkl_xml("Fine");
    let bad = b"<CompositionPlaylist><Id>broken</CompositionPlaylist>";

    let dir = package_with(&[("a_pkl.xml", good.as_bytes()), ("b_cpl.xml", bad.as_slice())]);

    let err = Dcp::generate(dir.path()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    assert!(
        matches!(&err, DcpError::FailedToParseFile { path, .. } if path.ends_with("b_cpl.xml")),
        "unexpected error {err:?}"
    );
}

#[test]
fn test_unknown_asset_map_namespace() {
    let dir = package_with(&[]);
    fs::write(
        dir.path().join("ASSETMAP.xml"),
        r#"<AssetMap xmlns="urn:example:not-a-dcp"><Id>urn:uuid:x</Id><AssetList/></AssetMap>"#,
    )
    .unwrap();

    let dcp = Dcp::generate(dir.path()).unwrap();

    assert_eq!(dcp.format(), Format::Unknown);
    assert_eq!(dcp.files(), ["ASSETMAP.xml"]);
    assert_eq!(dcp.to_string(), "AssetMap: urn:uuid:x\n");
}
