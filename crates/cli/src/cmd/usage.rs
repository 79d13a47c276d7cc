use owo_colors::OwoColorize;

use monark_build_lib::consts::DEFAULT_SERVICE_CONFIG;

/// Print the target list shown when no command is given.
pub fn print_usage() {
  println!("{}", "Required sections:".bold());
  println!("  build       stage the project into the build directory");
  println!("  clean       remove the build directory, archives and environment");
  println!("  test        run all tests");
  println!("  pack        make the output archive, named \"<project>-<version>-<branch>.tar.gz\"");
  println!("{}", "Additional sections:".bold());
  println!("  venv        create the conda environment and install the SDK");
  println!("  pp-cmd      generate command entry points inside the environment");
  println!("  config      write {} if it does not exist", DEFAULT_SERVICE_CONFIG);
  println!("  dev         link the working copy into the environment");
  println!("  branch      print the branch token used in archive names");
  println!("  init        write a default mbuild.toml");
  println!("  clean-build, clean-pack, clean-test, clean-venv");
  println!();
  println!("Run `mbuild --help` for options.");
}
