mod tests_line;
