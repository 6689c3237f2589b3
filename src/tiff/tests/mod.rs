mod byte_order_tests;
mod source_tests;
mod test_utils;
