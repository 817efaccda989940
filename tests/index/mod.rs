mod tests_watched_files;
mod tests_workspace_index;
