//! The `ctest.h` support header.
//!
//! Test sources include this header to obtain `CTEST_DEF` and the assertion
//! macros. Its content never varies between runs.

/// Full text of the support header, newline terminated.
pub const SUPPORT_HEADER: &str = concat!(
    "// DO NOT EDIT (THIS CODE IS AUTOMATICALLY GENERATED)\n",
    "\n",
    "#ifndef CTEST_H\n",
    "#define CTEST_H\n",
    "\n",
    "#define CTEST_DEF(name) void name(int* ctest_exec_result)\n",
    "#define CTEST_FAIL *ctest_exec_result = -1\n",
    "#define CTEST_ABORT return\n",
    "#define CTEST_EXPECT_EQUAL(x,y) if ((x) != (y)) { CTEST_FAIL; }\n",
    "#define CTEST_EXPECT_NOT_EQUAL(x,y) if ((x) == (y)) { CTEST_FAIL; }\n",
    "#define CTEST_EXPECT_ZERO(x) if ((x) != 0) { CTEST_FAIL; }\n",
    "#define CTEST_EXPECT_NONZERO(x) if ((x) == 0) { CTEST_FAIL; }\n",
    "#define CTEST_EXPECT_TRUE(x) CTEST_EXPECT_NONZERO(x);\n",
    "#define CTEST_EXPECT_FALSE(x) CTEST_EXPECT_ZERO(x);\n",
    "\n",
    "#endif\n",
);

/// Return the support header text.
#[must_use]
pub const fn support_header() -> &'static str {
    SUPPORT_HEADER
}
