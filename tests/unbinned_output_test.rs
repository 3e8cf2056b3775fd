use std::io::Read;

use camino::Utf8PathBuf;
use flate2::read::GzDecoder;
use gammatra::{write_unbinned_output, ReconstructedEvents};

#[test]
fn test_write_unbinned_output_gzip_csv() {
    let events =
        ReconstructedEvents::from_tra(camino::Utf8Path::new("tests/data/crab_sim.tra")).unwrap();

    let outdir = tempfile::tempdir().unwrap();
    let outfile = Utf8PathBuf::from_path_buf(outdir.path().join("unbinned_data.csv.gz")).unwrap();
    write_unbinned_output(&events.dataset, &outfile).unwrap();

    let mut decoded = String::new();
    GzDecoder::new(std::fs::File::open(&outfile).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();

    let mut lines = decoded.lines();
    let header = lines.next().unwrap();
    assert_eq!(
        header,
        "Energies [keV],TimeTags [s],\
         Xpointings_lon [rad],Xpointings_lat [rad],\
         Ypointings_lon [rad],Ypointings_lat [rad],\
         Zpointings_lon [rad],Zpointings_lat [rad],\
         Phi [rad],Chi local [rad],Psi local [rad],Distance [cm],\
         Chi galactic [rad],Psi galactic [rad]"
    );

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2);

    let first: Vec<&str> = rows[0].split(',').collect();
    assert_eq!(first.len(), 14);
    assert_eq!(first[0], "500");
    assert_eq!(first[1], "1835487300");
    // Galactic chi/psi cells are empty
    assert_eq!(first[12], "");
    assert_eq!(first[13], "");

    // NaN phi of the second event survives serialization
    let second: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(second[8], "NaN");
}
