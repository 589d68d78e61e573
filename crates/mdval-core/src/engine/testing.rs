//! Shell-script stand-ins for the engine binaries, used by unit tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub(crate) const SAMPLE_XVG: &str = r#"# gmx energy output
@    title "GROMACS Energies"
@ s0 legend "Bond"
@ s1 legend "Coulomb (SR)"
@ s2 legend "LJ (SR)"
@ s3 legend "Potential"
    0.000000   10.000000  -50.000000    5.000000  -35.000000
"#;

pub(crate) const SAMPLE_MDOUT: &str = "
   NSTEP       ENERGY          RMS            GMAX         NAME    NUMBER
      1      -1.0000E+01     1.0000E+00     1.0000E+00     C1         1

 BOND    =        2.0000  ANGLE   =        1.0000  DIHED      =        0.5000
 VDWAALS =       -1.5000  EEL     =      -12.0000  HBOND      =        0.0000
 1-4 VDW =        0.0000  1-4 EEL =        0.0000  RESTRAINT  =        0.0000

";

pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// A `gmx` driver that echoes its arguments, touches every `-o` target and writes
/// `xvg` as the `energy` subcommand's output.
pub(crate) fn fake_gmx(dir: &Path, xvg: &str) -> PathBuf {
    let data = dir.join("fake_energy.xvg");
    std::fs::write(&data, xvg).unwrap();
    let body = format!(
        r#"echo "$@"
sub="$1"
shift
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then out="$2"; fi
    shift
done
if [ "$sub" = "energy" ]; then
    read -r sel
    echo "selection: $sel"
    cp "{}" "$out"
else
    : > "$out"
fi
"#,
        data.display()
    );
    write_script(dir, "gmx", &body)
}

/// A `sander` that echoes its arguments and writes `mdout` to its `-o` target.
pub(crate) fn fake_sander(dir: &Path, mdout: &str) -> PathBuf {
    let data = dir.join("fake_mdout");
    std::fs::write(&data, mdout).unwrap();
    let body = format!(
        r#"echo "$@"
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then out="$2"; fi
    shift
done
cp "{}" "$out"
"#,
        data.display()
    );
    write_script(dir, "sander", &body)
}
