//! SystemVerilog sources reused across tests.

pub const TOP: &str = "\
module top;
  leaf u_leaf();
endmodule
";

pub const LEAF: &str = "\
module leaf;
endmodule
";

/// Instantiates a module no file declares.
pub const BROKEN: &str = "\
module broken;
  ghost u_ghost();
endmodule
";

pub const TWO_MODULES: &str = "\
module m1;
  module nested;
  endmodule
endmodule

module m2;
endmodule
";

pub const MACRO_HEADER: &str = "\
`define WIDTH 8
`define DEPTH 16
";

pub const MACROS_WITH_MODULE: &str = "\
`define LOCAL_ONLY 1
module with_macro;
endmodule
";

pub const PKG_A: &str = "\
package a_pkg;
  import b_pkg::*;
endpackage
";

pub const PKG_B: &str = "\
package b_pkg;
  import a_pkg::*;
endpackage
";

pub const USES_PKG_A: &str = "\
module pkg_top;
  import a_pkg::*;
endmodule
";

/// Every module is instantiated inside the same file.
pub const MUTUAL: &str = "\
module ping;
  pong u_pong();
endmodule

module pong;
  ping u_ping();
endmodule
";

pub const ONLY_PACKAGE: &str = "\
package lonely_pkg;
endpackage
";
