// bases/download_cli/src/app.rs
use crate::args::Args;
use crate::menu::{parse_max_results, MenuChoice};
use crate::output::{ConsoleProgress, OutputHandler};
use color_eyre::Result;
use media_downloader::{
    DownloadReport, DownloadRequest, FolderManager, MediaDownloader, OptionsBuilder,
};
use std::num::NonZeroU32;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct App<R> {
    output: OutputHandler,
    downloader: MediaDownloader,
    input: Lines<R>,
}

impl App<BufReader<Stdin>> {
    pub fn new(args: Args) -> Result<Self> {
        let downloader = MediaDownloader::new(
            FolderManager::in_home()?,
            OptionsBuilder::beside_executable()?,
        );
        Ok(Self::with_input(
            OutputHandler::new(args.verbose),
            downloader,
            BufReader::new(tokio::io::stdin()),
        ))
    }
}

impl<R: AsyncBufRead + Unpin> App<R> {
    pub fn with_input(output: OutputHandler, downloader: MediaDownloader, input: R) -> Self {
        Self {
            output,
            downloader,
            input: input.lines(),
        }
    }

    /// Menu loop. Returns on the exit choice or when input runs out;
    /// failed operations are reported and the loop carries on.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.output.print_menu();
            let Some(line) = self.prompt("Choose an option: ").await? else {
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                self.output.print_invalid_choice(&line);
                continue;
            };

            if choice == MenuChoice::Exit {
                self.output.print_goodbye();
                break;
            }

            match self.handle(choice).await {
                Ok(Some(report)) => self.output.print_report(&report),
                Ok(None) => break,
                Err(error) => self.output.print_error(&error),
            }
        }
        Ok(())
    }

    /// `None` means input ended before the request was complete
    async fn handle(&mut self, choice: MenuChoice) -> Result<Option<DownloadReport>> {
        let Some(request) = self.read_request(choice).await? else {
            return Ok(None);
        };

        let mut progress = ConsoleProgress::new();
        let report = self.downloader.run(&request, &mut progress).await?;
        Ok(Some(report))
    }

    async fn read_request(&mut self, choice: MenuChoice) -> Result<Option<DownloadRequest>> {
        let request = match choice {
            MenuChoice::SingleLink => {
                let Some(url) = self.prompt("Enter the YouTube video URL: ").await? else {
                    return Ok(None);
                };
                DownloadRequest::single(&url)?
            }
            MenuChoice::PlaylistLink => {
                let Some(url) = self.prompt("Enter the YouTube playlist URL: ").await? else {
                    return Ok(None);
                };
                DownloadRequest::playlist(&url)?
            }
            MenuChoice::ArtistSearch => {
                let Some(term) = self.prompt("Enter the artist name: ").await? else {
                    return Ok(None);
                };
                let Some(max_results) = self.read_max_results().await? else {
                    return Ok(None);
                };
                DownloadRequest::artist(&term, max_results)?
            }
            MenuChoice::GenreSearch => {
                let Some(term) = self.prompt("Enter the genre: ").await? else {
                    return Ok(None);
                };
                let Some(max_results) = self.read_max_results().await? else {
                    return Ok(None);
                };
                DownloadRequest::genre(&term, max_results)?
            }
            MenuChoice::Exit => return Ok(None),
        };
        Ok(Some(request))
    }

    async fn read_max_results(&mut self) -> Result<Option<NonZeroU32>> {
        let Some(input) = self
            .prompt("Enter the number of videos to search (e.g., 10): ")
            .await?
        else {
            return Ok(None);
        };

        let max_results = parse_max_results(&input);
        if max_results.defaulted {
            self.output.print_max_results_warning(&input);
        }
        Ok(Some(max_results.value))
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.output.prompt(text)?;
        Ok(self.input.next_line().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_downloader::stub::DownloaderStub;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn app(base: &Path, stub: Arc<DownloaderStub>, script: &'static str) -> App<&'static [u8]> {
        let downloader = MediaDownloader::new_with_downloader(
            FolderManager::new(base),
            OptionsBuilder::with_install_dir(base),
            stub,
        );
        App::with_input(OutputHandler::new(false), downloader, script.as_bytes())
    }

    #[tokio::test]
    async fn test_exit_choice_ends_loop() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path(), Arc::default(), "5\n");

        assert!(app.run().await.is_ok());
        assert!(app.input.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_end_of_input_ends_loop() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(temp_dir.path(), Arc::default(), "");

        assert!(app.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_unrecognized_choices_reprompt_without_side_effects() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::default());
        let mut app = app(temp_dir.path(), stub.clone(), "9\nartist\n\n5\nleftover\n");

        assert!(app.run().await.is_ok());
        // The loop stopped at the exit choice, not before
        assert_eq!(app.input.next_line().await.unwrap().as_deref(), Some("leftover"));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert!(stub.search_calls().is_empty());
        assert!(stub.download_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_operation_returns_to_menu() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::default());
        let mut app = app(temp_dir.path(), stub.clone(), "1\n \n3\n   \n7\n5\nleftover\n");

        assert!(app.run().await.is_ok());
        assert_eq!(app.input.next_line().await.unwrap().as_deref(), Some("leftover"));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert!(stub.download_calls().is_empty());
    }

    #[tokio::test]
    async fn test_downloader_failure_returns_to_menu() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub {
            fail_search: true,
            ..DownloaderStub::default()
        });
        let script = "4\nTrip Hop\n3\n2\nUnderworld\n5\nleftover\n";
        let mut app = app(temp_dir.path(), stub.clone(), script);

        assert!(app.run().await.is_ok());
        assert_eq!(
            stub.search_calls(),
            vec!["ytsearch3:Trip Hop songs".to_string()]
        );
        // "2" was read as a menu choice after the failure
        assert_eq!(stub.download_calls().len(), 1);
        assert_eq!(stub.download_calls()[0].0, vec!["Underworld".to_string()]);
        assert_eq!(app.input.next_line().await.unwrap().as_deref(), Some("leftover"));
    }

    #[tokio::test]
    async fn test_unusable_count_searches_with_default() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::with_titles(&["Creep", "Karma Police"]));
        let mut app = app(temp_dir.path(), stub.clone(), "3\nRadiohead\nabc\n5\n");

        assert!(app.run().await.is_ok());
        assert_eq!(
            stub.search_calls(),
            vec!["ytsearch10:Radiohead songs".to_string()]
        );
        let calls = stub.download_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.len(), 2);
        assert!(temp_dir.path().join("Radiohead").is_dir());
    }

    #[tokio::test]
    async fn test_single_link_is_downloaded_as_typed() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::default());
        let mut app = app(temp_dir.path(), stub.clone(), "1\nyoutu.be/XFkzRNyygfk\n5\n");

        assert!(app.run().await.is_ok());
        assert!(stub.search_calls().is_empty());
        let calls = stub.download_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["youtu.be/XFkzRNyygfk".to_string()]);
        assert!(calls[0].1.no_playlist);
        assert!(temp_dir.path().join("Single_Songs").is_dir());
    }

    #[tokio::test]
    async fn test_input_ending_mid_request_ends_loop() {
        let temp_dir = TempDir::new().unwrap();
        let stub = Arc::new(DownloaderStub::default());
        let mut app = app(temp_dir.path(), stub.clone(), "4\nambient\n");

        assert!(app.run().await.is_ok());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert!(stub.search_calls().is_empty());
    }
}
