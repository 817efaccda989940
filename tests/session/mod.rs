mod tests_diagnostics;
mod tests_lifecycle;
mod tests_modes;
