use anyhow::Result;
use radport_client::RadiographUpload;

use super::{build_client, build_session};
use crate::cli::args::{ConnectionArgs, UploadArgs};
use crate::exit_codes::SUCCESS;

pub async fn run(conn: &ConnectionArgs, args: UploadArgs) -> Result<i32> {
    let upload = RadiographUpload::from_path(&args.file, args.content_type.as_deref()).await?;
    let client = build_client(conn)?;
    let session = build_session(conn);

    let size = upload.bytes.len();
    let name = upload.file_name.clone();
    if client.upload_radiograph(&session, upload).await? {
        println!("Uploaded {} ({} bytes)", name, size);
    } else {
        println!("Sent {} ({} bytes); the portal did not confirm it", name, size);
    }
    Ok(SUCCESS)
}
