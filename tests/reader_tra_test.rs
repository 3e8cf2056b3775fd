use camino::Utf8Path;
use gammatra::{GammatraError, ReconstructedEvents, ReferenceFrame};

use approx::assert_relative_eq;

#[test]
fn test_tra_reader() {
    let path_file = Utf8Path::new("tests/data/crab_sim.tra");
    let events = ReconstructedEvents::from_tra(path_file).unwrap();
    let dataset = &events.dataset;

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.time_tags, vec![1835487300.0, 1835487301.5]);
    assert_eq!(dataset.energies, vec![500.0, 500.0]);

    // Compton angles: first event in domain, second out of domain (NaN)
    assert_relative_eq!(dataset.phi[0], 1.2464723630783294, epsilon = 1e-12);
    assert!(dataset.phi[1].is_nan());

    // X longitude 350 deg wraps to -10 deg; latitudes pass through
    assert_relative_eq!(
        dataset.x_pointings[0][0],
        -0.17453292519943295,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        dataset.x_pointings[0][1],
        -0.17453292519943295,
        epsilon = 1e-12
    );
    assert_relative_eq!(dataset.z_pointings[0][0], 1.3962634015954636, epsilon = 1e-12);

    // Y axis derived from cross(Z, X), per event
    assert_relative_eq!(dataset.y_pointings[0][0], 2.9670597283903604, epsilon = 1e-9);
    assert_relative_eq!(dataset.y_pointings[0][1], -1.3962634015954627, epsilon = 1e-9);
    assert_relative_eq!(dataset.y_pointings[1][0], -0.06136483151326035, epsilon = 1e-9);
    assert_relative_eq!(dataset.y_pointings[1][1], -1.2114213108598166, epsilon = 1e-9);

    // Interaction deltas: (0,1,0) and (3,0,4)
    assert_relative_eq!(dataset.distance[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(dataset.distance[1], 5.0, epsilon = 1e-12);
    assert_relative_eq!(dataset.chi_local[0], 4.71238898038469, epsilon = 1e-12);
    assert_relative_eq!(dataset.psi_local[0], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    assert_relative_eq!(dataset.chi_local[1], std::f64::consts::PI, epsilon = 1e-12);
    assert_relative_eq!(dataset.psi_local[1], 2.498091544796509, epsilon = 1e-12);

    // Galactic chi/psi are declared but never populated
    assert!(dataset.chi_galactic.is_empty());
    assert!(dataset.psi_galactic.is_empty());

    assert_eq!(events.attitude.len(), 2);
    assert_eq!(events.attitude.frame(), ReferenceFrame::Galactic);
}

#[test]
fn test_tra_gz_reader_matches_plain() {
    let plain = ReconstructedEvents::from_tra(Utf8Path::new("tests/data/crab_sim.tra")).unwrap();
    let gz = ReconstructedEvents::from_tra(Utf8Path::new("tests/data/crab_sim.tra.gz")).unwrap();

    assert_eq!(plain.dataset.time_tags, gz.dataset.time_tags);
    assert_eq!(plain.dataset.energies, gz.dataset.energies);
    assert_eq!(plain.dataset.x_pointings, gz.dataset.x_pointings);
    assert_eq!(plain.dataset.y_pointings, gz.dataset.y_pointings);
    assert_eq!(plain.dataset.z_pointings, gz.dataset.z_pointings);
    assert_eq!(plain.dataset.distance, gz.dataset.distance);
}

#[test]
fn test_unsupported_extension_rejected_before_reading() {
    // The path does not exist: the extension must be rejected before any
    // attempt to open or read the file.
    let result = ReconstructedEvents::from_tra(Utf8Path::new("tests/data/unbinned.dat"));
    assert_eq!(
        result.unwrap_err(),
        GammatraError::UnsupportedFileExtension("tests/data/unbinned.dat".to_string())
    );
}
