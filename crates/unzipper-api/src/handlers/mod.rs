pub mod archive_upload;
pub mod file_download;
